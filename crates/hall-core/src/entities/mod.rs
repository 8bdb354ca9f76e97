//! Entity structs for all Studyhall domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `hall-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema dumps.

mod achievement;
mod activity;
mod file;
mod goal;
mod group;
mod invitation;
mod message;
mod notification;
mod points;
mod profile;
mod study_session;
mod subject;
mod water;

pub use achievement::Achievement;
pub use activity::Activity;
pub use file::GroupFile;
pub use goal::Goal;
pub use group::{Group, GroupMember};
pub use invitation::Invitation;
pub use message::Message;
pub use notification::Notification;
pub use points::PointsEntry;
pub use profile::Profile;
pub use study_session::StudySession;
pub use subject::Subject;
pub use water::WaterIntake;
