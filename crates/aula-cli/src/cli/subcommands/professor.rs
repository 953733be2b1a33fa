use clap::Subcommand;

/// Professor administration commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProfessorCommands {
    /// List professors with their subject rosters.
    List,
    /// Get a professor by ID.
    Get { id: String },
    /// Create a professor.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value_t = 2)]
        max_subjects: u32,
    },
    /// Update a professor.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        max_subjects: Option<u32>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a professor (refused while subjects are assigned).
    Delete { id: String },
}
