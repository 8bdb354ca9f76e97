//! ID prefix constants.
//!
//! Every row ID is `<prefix>-<8 hex chars>`, generated by the database layer.

pub const PREFIX_PROFILE: &str = "usr";
pub const PREFIX_GROUP: &str = "grp";
pub const PREFIX_SUBJECT: &str = "sub";
pub const PREFIX_GOAL: &str = "gol";
pub const PREFIX_STUDY_SESSION: &str = "ses";
pub const PREFIX_POINTS: &str = "pts";
pub const PREFIX_WATER: &str = "wat";
pub const PREFIX_ACHIEVEMENT: &str = "ach";
pub const PREFIX_NOTIFICATION: &str = "ntf";
pub const PREFIX_INVITATION: &str = "inv";
pub const PREFIX_MESSAGE: &str = "msg";
pub const PREFIX_FILE: &str = "fil";
pub const PREFIX_ACTIVITY: &str = "act";

pub const ALL_PREFIXES: [&str; 13] = [
    PREFIX_PROFILE,
    PREFIX_GROUP,
    PREFIX_SUBJECT,
    PREFIX_GOAL,
    PREFIX_STUDY_SESSION,
    PREFIX_POINTS,
    PREFIX_WATER,
    PREFIX_ACHIEVEMENT,
    PREFIX_NOTIFICATION,
    PREFIX_INVITATION,
    PREFIX_MESSAGE,
    PREFIX_FILE,
    PREFIX_ACTIVITY,
];

/// Length of a group invite code.
pub const INVITE_CODE_LEN: usize = 8;
