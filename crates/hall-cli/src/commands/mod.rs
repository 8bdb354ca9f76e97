pub mod activity;
pub mod dispatch;
pub mod file;
pub mod goal;
pub mod group;
pub mod invite;
pub mod jobs;
pub mod leaderboard;
pub mod message;
pub mod notification;
pub mod points;
pub mod profile;
pub mod quiz;
pub mod schema;
pub mod serve;
pub mod session;
pub mod shared;
pub mod subject;
pub mod water;
