mod utils;
#[allow(unused)]
use utils::*;

use drover::Swarm;
use mock_service::MockConfig;
use std::num::NonZeroU32;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(20_000)]
async fn fleet_swarm_runs_every_task() {
    init();
    let host = mock_host(MockConfig::default()).await;

    let task_set = fleet_load::task_set()
        .set_wait_time(Duration::from_millis(10), Duration::from_millis(20))
        .unwrap();
    let stats = Swarm::new(task_set)
        .host(&host)
        .users(4)
        .hatch_rate(NonZeroU32::new(20).unwrap())
        .duration(Duration::from_secs(2))
        .report_interval(Duration::from_millis(500))
        .await
        .unwrap();

    assert_eq!(stats.name, fleet_load::TASK_SET_NAME);
    assert_eq!(stats.users, 4);
    assert!(stats.elapsed >= Duration::from_secs(2));

    let on_start = stats.task("on_start").unwrap();
    assert_eq!(on_start.success(), 4);

    for name in ["car_register", "car_list", "user_list", "user_register"] {
        let task = stats.task(name).unwrap();
        assert!(task.total() > 0, "{name} never ran");
    }
    // Listing never collides with other users.
    assert_eq!(stats.task("car_list").unwrap().error(), 0);
    assert_eq!(stats.task("user_list").unwrap().error(), 0);

    let logins = stats.request("login").unwrap();
    assert!(logins.success() >= 4);
    assert!(stats.request("logout").unwrap().success() > 0);
    assert!(stats.total_requests() > stats.tasks.iter().map(|t| t.total()).sum::<u64>());
}

#[cfg(feature = "integration")]
mod integration {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(60_000)]
    async fn fleet_swarm_respects_max_tps() {
        init();
        let host = mock_host(MockConfig::default()).await;

        let task_set = fleet_load::task_set()
            .set_wait_time(Duration::from_millis(50), Duration::from_millis(150))
            .unwrap();
        let stats = Swarm::new(task_set)
            .host(&host)
            .users(20)
            .hatch_rate(NonZeroU32::new(10).unwrap())
            .duration(Duration::from_secs(15))
            .max_tps(NonZeroU32::new(50).unwrap())
            .await
            .unwrap();

        println!("{stats}");
        assert_eq!(stats.users, 20);
        assert!(dbg!(stats.rps_mean) <= 55.);
        assert!(stats.total_requests() > 100);
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(60_000)]
    async fn overloaded_mock_reports_errors() {
        init();
        let host = mock_host(MockConfig {
            max_tps: NonZeroU32::new(20),
        })
        .await;

        let task_set = fleet_load::task_set()
            .set_wait_time(Duration::from_millis(5), Duration::from_millis(10))
            .unwrap();
        let stats = Swarm::new(task_set)
            .host(&host)
            .users(10)
            .hatch_rate(NonZeroU32::new(10).unwrap())
            .duration(Duration::from_secs(5))
            .await
            .unwrap();

        println!("{stats}");
        assert!(stats.total_errors() > 0);
        assert!(stats.error_rate() > 0.);
    }
}
