mod utils;
#[allow(unused)]
use utils::*;

use drover::prelude::*;
use fleet_load::{
    api,
    fixtures::{self, LoginResponse, NewUser, ADMIN},
    tasks,
};
use mock_service::MockConfig;
use std::num::NonZeroU32;
use std::time::Duration;

/// Run one task over and over with a single user for a short while.
async fn run_alone(host: &str, task: Task) -> RunStatistics {
    let task_set = TaskSet::new("alone")
        .set_wait_time(Duration::from_millis(10), Duration::from_millis(20))
        .unwrap()
        .register_task(task);

    Swarm::new(task_set)
        .host(host)
        .users(1)
        .hatch_rate(NonZeroU32::new(10).unwrap())
        .duration(Duration::from_millis(600))
        .report_interval(Duration::from_millis(200))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ntest::timeout(10_000)]
async fn taken_plate_skips_car_delete() {
    init();
    let host = mock_host(MockConfig::default()).await;
    let client = HttpClient::new(&host).unwrap();

    let reply = api::login(&client, ADMIN).await.unwrap();
    let LoginResponse { token } = reply.json().unwrap();
    api::create_car(&client, &Session::with_bearer(&token), &fixtures::car())
        .await
        .unwrap();

    let stats = run_alone(&host, tasks::car_register()).await;

    let create = stats.request("create_car").unwrap();
    assert!(create.error() > 0);
    assert_eq!(create.success(), 0);
    assert!(stats.request("delete_car").is_none());

    let logout = stats.request("logout").unwrap();
    assert!(logout.success() > 0);
    assert_eq!(logout.error(), 0);

    let task = stats.task("car_register").unwrap();
    assert_eq!(task.success(), 0);
    assert!(task.error() > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ntest::timeout(10_000)]
async fn failed_new_user_login_skips_user_delete() {
    init();
    let host = mock_host(MockConfig::default()).await;
    let client = HttpClient::new(&host).unwrap();

    // Same email, different password: registration conflicts and the login is refused.
    let squatter = NewUser {
        password: "not-john123",
        ..fixtures::user2()
    };
    api::register_user(&client, &squatter).await.unwrap();

    let stats = run_alone(&host, tasks::user_register()).await;

    let register = stats.request("register_user").unwrap();
    assert!(register.error() > 0);
    assert_eq!(register.success(), 0);
    assert!(stats.request("login").unwrap().error() > 0);
    assert!(stats.request("delete_user").is_none());

    let logout = stats.request("logout").unwrap();
    assert!(logout.success() > 0);
    assert_eq!(logout.error(), 0);
    assert!(stats.task("user_register").unwrap().error() > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ntest::timeout(10_000)]
async fn successful_create_is_followed_by_delete() {
    init();
    let host = mock_host(MockConfig::default()).await;

    let stats = run_alone(&host, tasks::car_register()).await;

    let create = stats.request("create_car").unwrap();
    let delete = stats.request("delete_car").unwrap();
    assert!(create.success() > 0);
    assert_eq!(create.error(), 0);
    // The swarm may stop a user between its create and delete.
    assert!(delete.success() <= create.success());
    assert!(delete.success() + 1 >= create.success());
    assert_eq!(stats.task("car_register").unwrap().error(), 0);
}
