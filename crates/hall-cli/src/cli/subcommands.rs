mod activity;
mod file;
mod goal;
mod group;
mod invite;
mod jobs;
mod message;
mod notification;
mod profile;
mod session;
mod subject;
mod water;

pub use activity::ActivityCommands;
pub use file::FileCommands;
pub use goal::GoalCommands;
pub use group::GroupCommands;
pub use invite::InviteCommands;
pub use jobs::JobCommands;
pub use message::MessageCommands;
pub use notification::NotificationCommands;
pub use profile::ProfileCommands;
pub use session::SessionCommands;
pub use subject::SubjectCommands;
pub use water::WaterCommands;
