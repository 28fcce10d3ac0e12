use std::io::Read;

use chrono::Utc;
use clap::{Parser, Subcommand};

use eyenotes_core::{
    queue, Author, CoreConfig, EmrApi, RecordStore, RegistrationForm, Route, SectionSession, Shell,
};
use eyenotes_gateway::RestGateway;
use eyenotes_types::{
    derive_alerts, AntSegmentExamPayload, ComplaintsPayload, DiagnosisPayload, FundusExamPayload,
    HistoryPayload, InvestigationPayload, Patient, RefractionPayload, SectionKind, SectionPayload,
};

#[derive(Parser)]
#[command(name = "eyenotes")]
#[command(about = "eyeNotes clinic EMR CLI")]
struct Cli {
    /// REST base URL including the /api prefix
    #[arg(long)]
    api_url: Option<String>,
    /// Directory for locally persisted fallback state
    #[arg(long)]
    data_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the patient queue
    Queue {
        /// Refresh the table on the queue interval until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Verify the last 3 digits of a patient's MR number and open the record
    Verify {
        /// Patient record id
        patient_id: String,
        /// The last 3 digits of the MR number
        digits: String,
    },
    /// Register a new or returning patient
    Register {
        #[arg(long)]
        mr_number: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long, default_value = "")]
        parent_info: String,
        #[arg(long, default_value = "Male")]
        gender: String,
        #[arg(long, default_value = "")]
        dob: String,
        #[arg(long, default_value = "")]
        mobile: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "Tamil Nadu")]
        state: String,
        #[arg(long, default_value = "Routine Check-up")]
        purpose: String,
        #[arg(long, default_value = "")]
        allergies: String,
        #[arg(long, default_value = "")]
        conditions: String,
        /// Captured photo as a data URI
        #[arg(long)]
        photo: Option<String>,
    },
    /// Show a patient's record banner: demographics, alerts, visit history
    Record {
        /// Patient record id
        patient_id: String,
    },
    /// Show one clinical section of a patient's record
    Show {
        /// Patient record id
        patient_id: String,
        /// Section kind (complaints, history, diagnosis, investigation,
        /// fundusexam, antsegmentexam, refraction)
        section: SectionKind,
    },
    /// Save one clinical section from a JSON payload (file or stdin)
    Save {
        /// Patient record id
        patient_id: String,
        /// Section kind
        section: SectionKind,
        /// Read the payload from this file instead of stdin
        #[arg(long)]
        file: Option<String>,
        /// Author the save is attributed to
        #[arg(long, default_value = "Dr. Chris Diana Pius")]
        author: String,
        #[arg(long, default_value = "Ophthalmologist")]
        role: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let api_url = cli
        .api_url
        .or_else(|| std::env::var("EMR_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:5000/api".into());
    let data_dir = cli
        .data_dir
        .or_else(|| std::env::var("EMR_DATA_DIR").ok())
        .unwrap_or_else(|| "./emr_data".into());

    let cfg = CoreConfig::new(api_url, data_dir.into())?;
    let gateway = RestGateway::new(cfg.api_base_url())?;

    match cli.command {
        Commands::Queue { watch } => {
            let store = RecordStore::open(&cfg, &gateway);
            print_queue(&store);
            while watch {
                std::thread::sleep(queue::QUEUE_REFRESH_INTERVAL);
                print_queue(&store);
            }
        }
        Commands::Verify { patient_id, digits } => {
            let store = RecordStore::open(&cfg, &gateway);
            let Some(patient) = store.get_patient(&patient_id) else {
                eprintln!("No patient with id {patient_id}.");
                std::process::exit(1);
            };
            match queue::verify_mr(patient, &digits) {
                Ok(route) => {
                    let mut shell = Shell::new();
                    shell.navigate(route);
                    if let Route::Record { patient_id } = shell.route() {
                        println!("Verified. Opening record for {patient_id}.");
                    }
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Record { patient_id } => {
            match gateway.fetch_patient_or_default(&patient_id) {
                Some(patient) => print_record_banner(&patient),
                None => {
                    let store = RecordStore::open(&cfg, &gateway);
                    let Some(patient) = store.get_patient(&patient_id) else {
                        eprintln!("No patient with id {patient_id}.");
                        std::process::exit(1);
                    };
                    print_record_banner(patient);
                }
            }
        }
        Commands::Register {
            mr_number,
            name,
            age,
            parent_info,
            gender,
            dob,
            mobile,
            city,
            state,
            purpose,
            allergies,
            conditions,
            photo,
        } => {
            let mut store = RecordStore::open(&cfg, &gateway);
            let mut form = RegistrationForm {
                mr_number,
                name,
                age,
                parent_info,
                gender,
                dob,
                mobile,
                city,
                state,
                purpose,
                allergies,
                conditions,
                ..RegistrationForm::default()
            };

            if form.lookup_mr(&store) {
                println!(
                    "MR {} is registered; visit marked as review.",
                    form.mr_number
                );
            }
            if let Some(photo) = photo {
                form.attach_photo(photo);
            }

            match form.submit(&mut store, &gateway, Utc::now()) {
                Ok(registered) => {
                    println!(
                        "Registered {} as {} ({}).",
                        registered.patient.name,
                        registered.patient.id,
                        registered.patient.visit_type
                    );
                }
                Err(e) => {
                    eprintln!("Registration blocked: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Show {
            patient_id,
            section,
        } => match section {
            SectionKind::Complaints => show::<ComplaintsPayload>(&gateway, &patient_id)?,
            SectionKind::History => show::<HistoryPayload>(&gateway, &patient_id)?,
            SectionKind::Diagnosis => show::<DiagnosisPayload>(&gateway, &patient_id)?,
            SectionKind::Investigation => show::<InvestigationPayload>(&gateway, &patient_id)?,
            SectionKind::FundusExam => show::<FundusExamPayload>(&gateway, &patient_id)?,
            SectionKind::AntSegmentExam => show::<AntSegmentExamPayload>(&gateway, &patient_id)?,
            SectionKind::Refraction => show::<RefractionPayload>(&gateway, &patient_id)?,
        },
        Commands::Save {
            patient_id,
            section,
            file,
            author,
            role,
        } => {
            let author = Author::new(author, role)?;
            let payload = read_payload(file.as_deref())?;
            match section {
                SectionKind::Complaints => save::<ComplaintsPayload>(&gateway, &patient_id, &payload, &author)?,
                SectionKind::History => save::<HistoryPayload>(&gateway, &patient_id, &payload, &author)?,
                SectionKind::Diagnosis => save::<DiagnosisPayload>(&gateway, &patient_id, &payload, &author)?,
                SectionKind::Investigation => save::<InvestigationPayload>(&gateway, &patient_id, &payload, &author)?,
                SectionKind::FundusExam => save::<FundusExamPayload>(&gateway, &patient_id, &payload, &author)?,
                SectionKind::AntSegmentExam => save::<AntSegmentExamPayload>(&gateway, &patient_id, &payload, &author)?,
                SectionKind::Refraction => save::<RefractionPayload>(&gateway, &patient_id, &payload, &author)?,
            }
        }
    }

    Ok(())
}

fn print_queue(store: &RecordStore) {
    let now = Utc::now().timestamp_millis();
    let rows = queue::queue_rows(store.patients(), now);
    if rows.is_empty() {
        println!("No patients in the queue.");
        return;
    }

    println!(
        "{:<10} {:<24} {:>4} {:<7} {:<4} {:<16} {:<24}",
        "ID", "Name", "Age", "Sex", "N/R", "Waiting", "Purpose"
    );
    for row in rows {
        println!(
            "{:<10} {:<24} {:>4} {:<7} {:<4} {:<16} {:<24}",
            row.patient_id,
            row.name,
            row.age,
            row.gender,
            row.visit_type,
            row.elapsed_wait,
            row.purpose
        );
    }
    println!(
        "{} waiting of {} patients.",
        queue::waiting_count(store.patients()),
        store.patients().len()
    );
}

fn print_record_banner(patient: &Patient) {
    println!(
        "{}  {} yrs / {} / {}",
        patient.name, patient.age, patient.gender, patient.mr_number
    );
    if !patient.parent_info.is_empty() {
        println!("{}", patient.parent_info);
    }

    let alerts = derive_alerts(patient);
    if !alerts.is_empty() {
        let labels: Vec<String> = alerts.iter().map(|a| a.display_label()).collect();
        println!("Alerts: {}", labels.join(" | "));
    }

    if patient.visit_history.is_empty() {
        println!("No previous visits; first visit.");
        return;
    }
    println!("Visit count: {}", patient.visit_history.len());
    for visit in &patient.visit_history {
        println!(
            "  #{:<3} {} {}  [{}]",
            visit.id,
            visit.date,
            visit.location,
            visit.badges().join(", ")
        );
    }
}

fn read_payload(file: Option<&str>) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let contents = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&contents)?)
}

fn show<P: SectionPayload>(
    gateway: &RestGateway,
    patient_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SectionSession::<P>::new(patient_id);
    session.load(gateway);

    if session.has_saved_record() {
        if let (Some(by), Some(at)) = (session.saved_by(), session.saved_at()) {
            println!("{by} @ {}", at.format("%d %b %Y %I:%M %p"));
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&session.display_payload())?
        );
    } else {
        println!("No saved record yet; blank form:");
        println!("{}", serde_json::to_string_pretty(session.payload())?);
    }
    Ok(())
}

fn save<P: SectionPayload>(
    gateway: &RestGateway,
    patient_id: &str,
    payload: &serde_json::Value,
    author: &Author,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed: P = serde_json::from_value(payload.clone())?;

    let mut session = SectionSession::<P>::new(patient_id);
    session.load(gateway);
    session.edit(|current| *current = parsed);

    match session.save(gateway, author) {
        Ok(receipt) => {
            println!(
                "Saved {} for {} at {}.",
                P::KIND,
                patient_id,
                receipt.saved_at.format("%d %b %Y %I:%M %p")
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Save failed, record left editable: {e}");
            std::process::exit(1);
        }
    }
}
