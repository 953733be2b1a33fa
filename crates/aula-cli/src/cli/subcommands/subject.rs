use clap::Subcommand;

/// Subject catalog commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SubjectCommands {
    /// List subjects, optionally filtered.
    List {
        /// Only active subjects.
        #[arg(long)]
        active: bool,
        /// Only active subjects with seats available.
        #[arg(long)]
        available: bool,
        /// Only subjects taught by this professor.
        #[arg(long)]
        professor: Option<String>,
        /// Name substring search.
        #[arg(long)]
        search: Option<String>,
    },
    /// Get a subject by ID.
    Get { id: String },
    /// Create a subject assigned to a professor.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        professor: String,
        #[arg(long, default_value_t = 3)]
        credits: u32,
        #[arg(long, default_value = "")]
        schedule: String,
        #[arg(long, default_value_t = 30)]
        capacity: u32,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update a subject.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        professor: Option<String>,
        #[arg(long)]
        schedule: Option<String>,
        #[arg(long)]
        capacity: Option<u32>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Retire a subject without touching existing enrollments.
    Deactivate { id: String },
    /// Delete a subject (refused while students are enrolled).
    Delete { id: String },
}
