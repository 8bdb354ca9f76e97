use clap::Subcommand;

/// Invitation commands.
#[derive(Clone, Debug, Subcommand)]
pub enum InviteCommands {
    /// Invite a profile to a group.
    Send { group: String, invitee: String },
    /// List invitations addressed to the acting user.
    List {
        /// Include answered and cancelled invitations.
        #[arg(long)]
        all: bool,
    },
    /// List a group's invitations.
    Group { id: String },
    /// Accept an invitation.
    Accept { id: String },
    /// Decline an invitation.
    Decline { id: String },
    /// Withdraw a pending invitation (inviter or group manager).
    Cancel { id: String },
}
