//! End-to-end flow through the public `HallService` API.

use chrono::Utc;
use pretty_assertions::assert_eq;

use hall_core::enums::{AchievementKind, GoalStatus, GoalUnit, LeaderboardPeriod, NotificationKind};
use hall_db::error::DatabaseError;
use hall_db::repos::goal::NewGoal;
use hall_db::service::HallService;

#[tokio::test]
async fn group_goal_session_leaderboard_flow() {
    let svc = HallService::new_local(":memory:").await.unwrap();
    let ada = svc.create_profile("Ada", None).await.unwrap();
    let bo = svc.create_profile("Bo", None).await.unwrap();

    let group = svc.create_group(&ada.id, "Finals prep", None).await.unwrap();
    let invitation = svc.send_invitation(&ada.id, &group.id, &bo.id).await.unwrap();
    svc.respond_to_invitation(&bo.id, &invitation.id, true).await.unwrap();

    let minutes_goal = svc
        .create_goal(
            &ada.id,
            &group.id,
            NewGoal {
                title: "Two hours together".into(),
                unit: GoalUnit::Time,
                target: 120,
                subject_id: None,
                deadline: None,
            },
        )
        .await
        .unwrap();
    let exercises = svc
        .create_goal(
            &ada.id,
            &group.id,
            NewGoal {
                title: "Problem set".into(),
                unit: GoalUnit::Exercises,
                target: 10,
                subject_id: None,
                deadline: None,
            },
        )
        .await
        .unwrap();

    // Bo studies 90 minutes, Ada 45: the shared time goal completes.
    svc.log_study_session(&bo.id, Some(&group.id), None, 90, None).await.unwrap();
    let ada_session = svc
        .log_study_session(&ada.id, Some(&group.id), None, 45, None)
        .await
        .unwrap();
    assert_eq!(ada_session.goals.updated.len(), 1);
    assert_eq!(ada_session.goals.updated[0].applied, 30);
    assert!(ada_session.goals.updated[0].completed);
    assert_eq!(
        svc.get_goal(&minutes_goal.id).await.unwrap().status,
        GoalStatus::Completed
    );

    // Ada solves 4 exercises: 4 x 5 = 20 points.
    let progress = svc.update_goal_progress(&ada.id, &exercises.id, 4).await.unwrap();
    assert_eq!(progress.points_awarded, 20);

    let board = svc
        .leaderboard(Some(&group.id), LeaderboardPeriod::AllTime, Utc::now(), None)
        .await
        .unwrap();
    let rows: Vec<_> = board
        .entries
        .iter()
        .map(|e| (e.rank, e.user_id.clone(), e.points))
        .collect();
    assert_eq!(
        rows,
        vec![(1, bo.id.clone(), 90), (2, ada.id.clone(), 65)]
    );

    let stats = svc.profile_stats(&ada.id, Utc::now().date_naive()).await.unwrap();
    assert_eq!(stats.total_points, 65);
    assert_eq!(stats.total_minutes, 45);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.goals_completed, 1);
    let kinds: Vec<_> = stats.achievements.iter().map(|a| a.kind).collect();
    assert!(kinds.contains(&AchievementKind::FirstSession));
    assert!(kinds.contains(&AchievementKind::GoalCompleted));

    let bo_notes = svc.list_notifications(&bo.id, false, 50).await.unwrap();
    assert!(bo_notes.iter().any(|n| n.kind == NotificationKind::GoalCompleted));
}

#[tokio::test]
async fn state_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyhall.db");
    let path = path.to_str().unwrap();

    let id = {
        let svc = HallService::new_local(path).await.unwrap();
        let ada = svc.create_profile("Ada", None).await.unwrap();
        svc.log_water(&ada.id, 300).await.unwrap();
        ada.id
    };

    let svc = HallService::new_local(path).await.unwrap();
    assert_eq!(svc.get_profile(&id).await.unwrap().display_name, "Ada");
    let day = svc.water_day(&id, Utc::now().date_naive()).await.unwrap();
    assert_eq!(day.progress.total_ml, 300);
}

#[tokio::test]
async fn missing_entities_surface_as_no_result() {
    let svc = HallService::new_local(":memory:").await.unwrap();
    assert!(matches!(svc.get_goal("gol-nope").await, Err(DatabaseError::NoResult)));
    assert!(matches!(svc.get_group("grp-nope").await, Err(DatabaseError::NoResult)));
    assert!(matches!(
        svc.join_group("usr-nope", "ZZZZZZZZ").await,
        Err(DatabaseError::NoResult)
    ));
}
