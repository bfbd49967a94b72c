//! End-to-end tests of the directory store over the in-memory API.
//!
//! Every operation goes through the real store: the reducer starts the
//! call, the runtime resolves it, and the result action is applied.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use composable_admin_runtime::StoreError;
use std::sync::Arc;
use std::time::Duration;
use user_directory::{
    Alert, AlertStatus, Config, DirectoryAction, DirectoryState, MockUserApi, Operation,
    PendingDeletion, User, UserDirectory, UserForm, UserId,
};

fn seeded(names: &[&str]) -> Arc<MockUserApi> {
    Arc::new(MockUserApi::with_users(
        names
            .iter()
            .zip(1..)
            .map(|(name, id)| User::new(UserId::new(id), *name))
            .collect(),
    ))
}

async fn loaded(api: &Arc<MockUserApi>) -> UserDirectory<MockUserApi> {
    let directory = UserDirectory::new(Arc::clone(api));
    directory
        .get_users()
        .await
        .unwrap()
        .wait_with_timeout(Duration::from_secs(1))
        .await
        .unwrap();
    directory
}

#[tokio::test]
async fn fresh_directory_is_busy_with_default_pager() {
    let directory = UserDirectory::new(Arc::new(MockUserApi::new()));
    let state = directory.snapshot().await;

    assert_eq!(state, DirectoryState::new());
    assert!(directory.is_mounted());
}

#[tokio::test]
async fn get_users_fills_table_and_clears_busy() {
    let api = seeded(&["ana", "bo", "cy"]);
    let directory = loaded(&api).await;

    let state = directory.snapshot().await;
    assert_eq!(state.user_count(), 3);
    assert_eq!(state.total_rows, 3);
    assert!(!state.is_busy);
    assert_eq!(state.alert, Alert::default());
    assert_eq!(api.calls(Operation::Load), 1);
}

#[tokio::test]
async fn create_appends_server_record() {
    let api = seeded(&["ana"]);
    let directory = loaded(&api).await;

    let form = UserForm::new("dee").with_field("email", "dee@example.com");
    directory.create_user(form).await.unwrap().wait().await;

    let state = directory.snapshot().await;
    let last = state.users.last().unwrap();
    assert_eq!(last.username, "dee");
    assert_eq!(last.attributes["email"], "dee@example.com");
    assert_eq!(state.alert, Alert::success("A user has been successfully created"));
}

#[tokio::test]
async fn edit_reports_success_without_patching_the_row() {
    let api = seeded(&["ana"]);
    let directory = loaded(&api).await;

    directory
        .edit_user(UserId::new(1), UserForm::new("anna"))
        .await
        .unwrap()
        .wait()
        .await;

    let state = directory.snapshot().await;
    assert_eq!(state.alert, Alert::success("A user has been successfully updated!"));
    assert_eq!(state.users[0].username, "ana");
    assert_eq!(api.users()[0].username, "anna");

    // The view mirrors the rename itself
    directory.update_username("anna", UserId::new(1)).await.unwrap();
    assert_eq!(directory.state(|s| s.users[0].username.clone()).await, "anna");
}

#[tokio::test]
async fn delete_removes_row_and_clears_staging() {
    let api = seeded(&["ana", "bo", "cy"]);
    let directory = loaded(&api).await;

    directory.update_user_to_delete("bo", UserId::new(2)).await.unwrap();
    assert_eq!(
        directory.state(|s| s.user_to_delete.clone()).await,
        Some(PendingDeletion {
            id: UserId::new(2),
            username: "bo".to_string()
        })
    );

    directory.delete_user(UserId::new(2)).await.unwrap().wait().await;

    let state = directory.snapshot().await;
    assert!(state.get(UserId::new(2)).is_none());
    assert_eq!(state.total_rows, state.user_count());
    assert_eq!(state.total_rows, 2);
    assert!(state.user_to_delete.is_none());
    assert_eq!(state.alert, Alert::success("A user has been successfully deleted!"));
}

#[tokio::test]
async fn delete_of_row_missing_locally_keeps_rows() {
    let api = seeded(&["ana", "bo"]);
    let directory = UserDirectory::new(Arc::clone(&api));

    // The server knows id 2 but the table has not been loaded
    directory.delete_user(UserId::new(2)).await.unwrap().wait().await;

    let state = directory.snapshot().await;
    assert!(state.users.is_empty());
    assert_eq!(state.alert.status, AlertStatus::Success);
    assert_eq!(api.users().len(), 1);
}

#[tokio::test]
async fn failures_alert_and_leave_rows_untouched() {
    let api = seeded(&["ana", "bo"]);
    let directory = loaded(&api).await;
    let before = directory.state(|s| s.users.clone()).await;

    let cases = [
        (Operation::Create, "There is an error in creating a user"),
        (Operation::Edit, "There is an error in updating a user"),
        (Operation::Delete, "There is an error in deleting a user"),
        (Operation::Load, "There is an error in loading users"),
    ];

    for (operation, message) in cases {
        api.fail(operation);
        let mut handle = match operation {
            Operation::Create => directory.create_user(UserForm::new("x")).await,
            Operation::Edit => directory.edit_user(UserId::new(1), UserForm::new("x")).await,
            Operation::Delete => directory.delete_user(UserId::new(1)).await,
            Operation::Load => directory.get_users().await,
        }
        .unwrap();
        handle.wait().await;

        let state = directory.snapshot().await;
        assert_eq!(state.alert, Alert::danger(message), "{operation}");
        assert_eq!(state.users, before, "{operation}");
        assert!(!state.is_busy);
    }
}

#[tokio::test]
async fn each_operation_issues_exactly_one_call() {
    let api = seeded(&["ana"]);
    let directory = loaded(&api).await;

    directory.create_user(UserForm::new("bo")).await.unwrap().wait().await;
    directory.edit_user(UserId::new(1), UserForm::new("an")).await.unwrap().wait().await;
    directory.delete_user(UserId::new(2)).await.unwrap().wait().await;

    // Mutations never touch the network
    directory.filter_users_table(0).await.unwrap();
    directory.update_user_to_edit(None).await.unwrap();

    for operation in [Operation::Load, Operation::Create, Operation::Edit, Operation::Delete] {
        assert_eq!(api.calls(operation), 1, "{operation}");
    }
    assert_eq!(api.total_calls(), 4);
}

#[tokio::test]
async fn filter_overrides_row_count_until_next_load() {
    let api = seeded(&["ana", "bo", "cy"]);
    let directory = loaded(&api).await;

    directory.filter_users_table(1).await.unwrap();
    assert_eq!(directory.state(|s| (s.total_rows, s.user_count())).await, (1, 3));

    directory.get_users().await.unwrap().wait().await;
    assert_eq!(directory.state(|s| s.total_rows).await, 3);
}

#[tokio::test]
async fn unmount_discards_in_flight_results() {
    let api = Arc::new(
        MockUserApi::with_users(vec![User::new(UserId::new(1), "ana")])
            .with_latency(Duration::from_millis(50)),
    );
    let directory = UserDirectory::new(Arc::clone(&api));
    let mut results = directory.subscribe();

    let mut handle = directory.get_users().await.unwrap();
    directory.unmount();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let state = directory.snapshot().await;
    assert!(state.users.is_empty());
    assert!(state.is_busy);
    assert!(results.try_recv().is_err());

    // The call itself still went out
    assert_eq!(api.calls(Operation::Load), 1);

    assert!(matches!(
        directory.create_user(UserForm::new("late")).await,
        Err(StoreError::ShutdownInProgress)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unmount_discards_result_waiting_behind_a_reader() {
    let api = Arc::new(
        MockUserApi::with_users(vec![User::new(UserId::new(1), "ana")])
            .with_latency(Duration::from_millis(50)),
    );
    let directory = UserDirectory::new(Arc::clone(&api));
    let mut results = directory.subscribe();

    let mut handle = directory.get_users().await.unwrap();

    // A view keeps reading while the response lands
    let (held_tx, held_rx) = tokio::sync::oneshot::channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    let reader = {
        let directory = directory.clone();
        tokio::spawn(async move {
            directory
                .state(move |_| {
                    held_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                })
                .await;
        })
    };
    held_rx.await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(api.calls(Operation::Load), 1);
    assert_eq!(directory.store().pending_effects(), 1);

    directory.unmount();
    release_tx.send(()).unwrap();
    reader.await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let state = directory.snapshot().await;
    assert!(state.users.is_empty());
    assert!(state.is_busy);
    assert!(results.try_recv().is_err());
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_calls() {
    let api = Arc::new(MockUserApi::new().with_latency(Duration::from_millis(30)));
    let directory = UserDirectory::new(Arc::clone(&api));

    let _handle = directory.create_user(UserForm::new("ana")).await.unwrap();
    directory.shutdown(Some(Duration::from_secs(1))).await.unwrap();

    // The server saw the create, the unmounted screen did not
    assert_eq!(api.users().len(), 1);
    assert!(directory.state(|s| s.users.is_empty()).await);
    assert!(!directory.is_mounted());
}

#[tokio::test]
async fn shutdown_times_out_on_slow_calls() {
    let api = Arc::new(MockUserApi::new().with_latency(Duration::from_millis(500)));
    let directory = UserDirectory::new(api);

    let _handle = directory.get_users().await.unwrap();
    let result = directory.shutdown(Some(Duration::from_millis(20))).await;

    assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
}

#[tokio::test]
async fn subscribers_see_results_after_they_are_applied() {
    let api = seeded(&["ana"]);
    let directory = UserDirectory::new(Arc::clone(&api));
    let mut results = directory.subscribe();

    let observer = {
        let directory = directory.clone();
        tokio::spawn(async move {
            let action = results.recv().await.unwrap();
            let rows = directory.state(|s| s.user_count()).await;
            (action, rows)
        })
    };

    directory.get_users().await.unwrap().wait().await;

    let (action, rows) = observer.await.unwrap();
    assert!(action.concludes(Operation::Load));
    assert!(matches!(action, DirectoryAction::UsersLoaded { ref users } if users.len() == 1));
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn concurrent_operations_each_apply_once() {
    let api = Arc::new(MockUserApi::new().with_latency(Duration::from_millis(5)));
    let directory = UserDirectory::new(Arc::clone(&api));

    let creates = (0..8).map(|n| {
        let directory = directory.clone();
        async move {
            directory
                .create_user(UserForm::new(format!("user-{n}")))
                .await
                .unwrap()
                .wait()
                .await;
        }
    });
    futures::future::join_all(creates).await;

    let state = directory.snapshot().await;
    assert_eq!(state.user_count(), 8);
    assert_eq!(api.calls(Operation::Create), 8);

    let mut ids: Vec<_> = state.users.iter().map(|u| u.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

#[tokio::test]
async fn from_config_applies_page_size_and_shutdown_timeout() {
    let config = Config::from_lookup(|key| match key {
        "USER_DIRECTORY_PER_PAGE" => Some("25".to_string()),
        "SHUTDOWN_TIMEOUT" => Some("2".to_string()),
        _ => None,
    });

    let directory = UserDirectory::from_config(Arc::new(MockUserApi::new()), &config);

    assert_eq!(directory.state(|s| s.per_page).await, 25);
    assert_eq!(
        directory.store().default_shutdown_timeout(),
        Duration::from_secs(2)
    );
}
