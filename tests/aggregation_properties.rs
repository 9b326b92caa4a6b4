use proptest::prelude::*;
use rask_trace_stats::StatsAggregator;
use rask_trace_stats::domain::{Endpoint, Operation, Service};
use rask_trace_stats::stats::DEFAULT_LATENCY_EPSILON;

#[derive(Debug, Clone)]
struct Observation {
    service: Option<Service>,
    operation: Option<Operation>,
    tenant: Option<String>,
    latency: String,
}

fn observation() -> impl Strategy<Value = Observation> {
    (
        prop::option::weighted(0.9, prop::sample::select(Service::ALL.to_vec())),
        prop::option::weighted(0.8, prop::sample::select(Operation::MATCH_ORDER.to_vec())),
        prop::option::of(prop::sample::select(vec!["H1", "H2", "H3"])),
        prop_oneof![
            (0.0f64..15.0).prop_map(|latency| latency.to_string()),
            Just("0".to_string()),
            Just("1e-6".to_string()),
            Just("not-a-number".to_string()),
            Just("NaN".to_string()),
        ],
    )
        .prop_map(|(service, operation, tenant, latency)| Observation {
            service,
            operation,
            tenant: tenant.map(str::to_string),
            latency,
        })
}

fn fold_all(observations: &[Observation]) -> StatsAggregator {
    let mut aggregator = StatsAggregator::new();
    for observation in observations {
        aggregator.record(
            observation.service,
            observation.operation,
            observation.tenant.as_deref(),
            &observation.latency,
        );
    }
    aggregator
}

proptest! {
    #[test]
    fn prop_count_is_errors_plus_latencies(observations in prop::collection::vec(observation(), 0..64)) {
        let aggregator = fold_all(&observations);

        let rollups = aggregator
            .services()
            .map(|(_, stats)| stats)
            .chain(aggregator.tenants().map(|(_, stats)| stats));
        for stats in rollups {
            let overall = stats.overall();
            prop_assert_eq!(overall.count(), overall.error_count() + overall.latencies().len() as u64);
            for (_, bucket) in stats.endpoints() {
                prop_assert_eq!(bucket.count(), bucket.error_count() + bucket.latencies().len() as u64);
                prop_assert!(bucket.latencies().iter().all(|latency| *latency > DEFAULT_LATENCY_EPSILON));
            }
        }
    }

    #[test]
    fn prop_every_resolved_record_is_aggregated_once(observations in prop::collection::vec(observation(), 0..64)) {
        let aggregator = fold_all(&observations);
        let resolved = observations.iter().filter(|o| o.service.is_some()).count() as u64;

        prop_assert_eq!(aggregator.aggregated(), resolved);
        prop_assert_eq!(aggregator.unresolved(), observations.len() as u64 - resolved);
        prop_assert_eq!(aggregator.services().map(|(_, stats)| stats.count()).sum::<u64>(), resolved);
        prop_assert_eq!(aggregator.tenants().map(|(_, stats)| stats.count()).sum::<u64>(), resolved);
    }

    #[test]
    fn prop_endpoint_buckets_never_exceed_service_total(observations in prop::collection::vec(observation(), 0..64)) {
        let aggregator = fold_all(&observations);
        for (_, stats) in aggregator.services() {
            let bucketed: u64 = stats.endpoints().map(|(_, bucket)| bucket.count()).sum();
            prop_assert!(bucketed <= stats.count());
        }
    }

    #[test]
    fn prop_merge_equals_single_fold(
        observations in prop::collection::vec(observation(), 0..64),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(observations.len() + 1);
        let (left, right) = observations.split_at(at);

        let mut merged = fold_all(left);
        merged.merge(&fold_all(right));

        prop_assert_eq!(merged, fold_all(&observations));
    }
}

#[test]
fn test_epsilon_boundary_is_strict() {
    let mut aggregator = StatsAggregator::new();
    aggregator.record(Some(Service::Sabre), Some(Operation::GetRoomRate), None, "1e-6");
    aggregator.record(Some(Service::Sabre), Some(Operation::GetRoomRate), None, "1.000001e-6");

    let room_rate = aggregator
        .service(Service::Sabre)
        .and_then(|stats| stats.endpoint(Endpoint::RoomRate))
        .unwrap();
    assert_eq!(room_rate.count(), 2);
    assert_eq!(room_rate.error_count(), 1);
    assert_eq!(room_rate.latencies(), &[1.000001e-6]);
}

#[test]
fn test_config_operation_has_no_bucket() {
    let mut aggregator = StatsAggregator::new();
    aggregator.record(Some(Service::Oracle), Some(Operation::ListAllConfigs), Some("H1"), "3.0");

    let oracle = aggregator.service(Service::Oracle).unwrap();
    assert_eq!(oracle.count(), 1);
    assert!(oracle.endpoints().all(|(_, bucket)| bucket.count() == 0));
    assert_eq!(aggregator.tenant("H1").unwrap().overall().latencies(), &[3.0]);
}
