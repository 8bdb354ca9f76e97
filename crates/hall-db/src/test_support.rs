//! Shared test utilities for hall-db tests.

pub(crate) mod helpers {
    use hall_core::entities::{Group, Profile};

    use crate::HallDb;
    use crate::service::HallService;

    /// Create an in-memory `HallService` with the default water goal.
    pub async fn test_service() -> HallService {
        let db = HallDb::open_local(":memory:").await.unwrap();
        HallService::from_db(db)
    }

    /// Create a profile and return it.
    pub async fn profile(svc: &HallService, name: &str) -> Profile {
        svc.create_profile(name, None).await.unwrap()
    }

    /// Create a group owned by `owner` and return it.
    pub async fn group(svc: &HallService, owner: &Profile, name: &str) -> Group {
        svc.create_group(&owner.id, name, None).await.unwrap()
    }

    /// Create a group with `owner` and add `members` via invite code.
    pub async fn group_with(svc: &HallService, owner: &Profile, members: &[&Profile]) -> Group {
        let group = group(svc, owner, "Study crew").await;
        for member in members {
            svc.join_group(&member.id, &group.invite_code).await.unwrap();
        }
        group
    }
}
