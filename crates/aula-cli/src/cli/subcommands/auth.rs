use clap::Subcommand;

/// Auth session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Register a new student and log in as them.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Semester number, 1-10.
        #[arg(long)]
        semester: u8,
    },
    /// Log in as an existing student by email.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Clear the session.
    Logout,
    /// Show the current session.
    Status,
}
