pub mod auth;
pub mod professor;
pub mod selection;
pub mod student;
pub mod subject;

pub use auth::AuthCommands;
pub use professor::ProfessorCommands;
pub use selection::SelectionCommands;
pub use student::StudentCommands;
pub use subject::SubjectCommands;
