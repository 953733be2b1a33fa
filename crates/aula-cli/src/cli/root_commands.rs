use clap::Subcommand;

use crate::cli::subcommands::{
    AuthCommands, ProfessorCommands, SelectionCommands, StudentCommands, SubjectCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Register, log in and out, inspect the session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Student directory and profile management.
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },
    /// Subject catalog administration.
    Subject {
        #[command(subcommand)]
        action: SubjectCommands,
    },
    /// Professor administration.
    Professor {
        #[command(subcommand)]
        action: ProfessorCommands,
    },
    /// Subject selection for the logged-in student.
    Selection {
        #[command(subcommand)]
        action: SelectionCommands,
    },
    /// Summary of the logged-in student's enrollment and the catalog.
    Dashboard,
}
