use clap::Subcommand;

/// Student directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StudentCommands {
    /// List students, optionally filtered.
    List {
        /// Only students enrolled in this subject.
        #[arg(long)]
        subject: Option<String>,
        /// Only students taught by this professor.
        #[arg(long)]
        professor: Option<String>,
        /// Name/email substring search.
        #[arg(long)]
        search: Option<String>,
    },
    /// Get a student by ID.
    Get { id: String },
    /// Update a student's profile fields.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Semester number, 1-10.
        #[arg(long)]
        semester: Option<u8>,
        #[arg(long)]
        gpa: Option<f64>,
    },
    /// Delete a student (admin operation, cascades their enrollments).
    Delete { id: String },
}
