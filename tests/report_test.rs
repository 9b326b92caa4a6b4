use rask_trace_stats::TracePipeline;
use rask_trace_stats::domain::RawEvent;
use rask_trace_stats::report::{
    read_detail_table, reaggregate, write_detail_table, write_statistics_table,
    write_timing_table,
};
use tempfile::TempDir;

fn batch() -> Vec<RawEvent> {
    let lines = [
        r#"{"request_uuid": "A", "calling_function": "windsurfer.GetAvailability", "message": "GRPC Request {'availabilityRequest': {'hotel': {'imsHotelId': 'USAMEBCK'}}}"}"#,
        r#"{"request_uuid": "A", "calling_function": "windsurfer.GetAvailability", "stats": {"time": 0.42}}"#,
        r#"{"request_uuid": "B", "calling_function": "sabre-room-rate-adapter.GetRoomRate", "stats": {"time": 7.5}}"#,
        r#"{"request_uuid": "C", "calling_function": "oracle.MakeReservation", "message": "GRPC Request {'reservationDetails': {'hotel': {'imsHotelId': 'JPTYOHTL'}}}"}"#,
        r#"{"request_uuid": "D", "calling_function": "oracle.CreateConfig", "stats": {"time": 1.1}}"#,
        r#"{"request_uuid": "E", "calling_function": "router.GetPackage", "stats": {"time": 0.3}}"#,
    ];
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| RawEvent::new(1_700_000_000_000 + i as i64, *line, "/ecs/concierge"))
        .collect()
}

#[test]
fn test_detail_table_reaggregates_to_same_stats() {
    let temp_dir = TempDir::new().unwrap();
    let output = TracePipeline::default().run(batch());
    let detail = temp_dir.path().join("full_log.csv");

    write_detail_table(&detail, &output.records).unwrap();
    let rebuilt = reaggregate(&[&detail], output.stats.epsilon()).unwrap();

    assert_eq!(rebuilt, output.stats);
}

#[test]
fn test_split_detail_tables_reaggregate_like_one() {
    let temp_dir = TempDir::new().unwrap();
    let output = TracePipeline::default().run(batch());
    let (left, right) = output.records.split_at(2);
    let first = temp_dir.path().join("part-0.csv");
    let second = temp_dir.path().join("part-1.csv");

    write_detail_table(&first, left).unwrap();
    write_detail_table(&second, right).unwrap();

    let rebuilt = reaggregate(&[first, second], output.stats.epsilon()).unwrap();
    assert_eq!(rebuilt, output.stats);
}

#[test]
fn test_detail_rows_content() {
    let temp_dir = TempDir::new().unwrap();
    let output = TracePipeline::default().run(batch());
    let detail = temp_dir.path().join("full_log.csv");
    write_detail_table(&detail, &output.records).unwrap();

    let rows = read_detail_table(&detail).unwrap();
    assert_eq!(rows.len(), 5);

    let first = &rows[0];
    assert_eq!(first.request_id, "A");
    assert_eq!(first.tenant_id, "USAMEBCK");
    assert_eq!(first.service, "windsurfer");
    assert_eq!(first.operation, "GetAvailability");
    assert_eq!(first.latency, "0.42");
    let events: serde_json::Value = serde_json::from_str(&first.raw_event_list).unwrap();
    assert_eq!(events.as_array().map(Vec::len), Some(2));

    let no_measurement = &rows[2];
    assert_eq!(no_measurement.request_id, "C");
    assert_eq!(no_measurement.latency, "0");

    let unresolved = &rows[4];
    assert_eq!(unresolved.service, "");
    assert_eq!(unresolved.operation, "GetPackage");
}

#[test]
fn test_statistics_and_timing_tables() {
    let temp_dir = TempDir::new().unwrap();
    let output = TracePipeline::default().run(batch());
    let stats = temp_dir.path().join("stats.csv");
    let timing = temp_dir.path().join("timing_log.csv");

    write_statistics_table(&stats, &output.stats).unwrap();
    write_timing_table(&timing, &output.records).unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&stats)
        .unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();

    assert_eq!(&rows[0][0], "Service");
    let services: Vec<&str> = rows[1..4].iter().map(|row| &row[0]).collect();
    assert_eq!(services, vec!["windsurfer", "sabre", "oracle"]);
    // oracle: the config call and one unmeasured reservation
    assert_eq!((&rows[3][1], &rows[3][2]), ("2", "1"));
    assert_eq!(&rows[6][0], "HotelCode");
    let tenants: Vec<&str> = rows[7..].iter().map(|row| &row[0]).collect();
    assert_eq!(tenants, vec!["", "JPTYOHTL", "USAMEBCK"]);

    let mut reader = csv::Reader::from_path(&timing).unwrap();
    let latencies: Vec<String> = reader
        .records()
        .map(|row| row.unwrap()[4].to_string())
        .collect();
    assert_eq!(latencies, vec!["0.42", "7.5", "1.1", "0.3"]);
}
