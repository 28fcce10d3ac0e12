//! Navigation between the queue, registration and record views.

use eyenotes_types::SectionKind;

/// A navigable destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Queue,
    Registration,
    Record { patient_id: String },
}

/// Shell state: the current route plus the sidebar's selected clinical
/// section within a record view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    route: Route,
    active_section: SectionKind,
}

impl Shell {
    /// Starts on the queue with the diagnosis section preselected, as the
    /// record view does.
    pub fn new() -> Self {
        Self {
            route: Route::Queue,
            active_section: SectionKind::Diagnosis,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn active_section(&self) -> SectionKind {
        self.active_section
    }

    pub fn navigate(&mut self, route: Route) {
        self.route = route;
    }

    /// Sidebar selection; only meaningful inside a record view but harmless
    /// elsewhere.
    pub fn select_section(&mut self, kind: SectionKind) {
        self.active_section = kind;
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
