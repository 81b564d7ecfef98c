//! Scenarios read from JSON, with limits from a CSV table

use bacflow::prelude::*;
use std::io::Write;

const LIMITS: &str = "\
alpha-2,regular,novice,professional
NO,0.02,0.02,0.02
GB,0.08,,
";

fn scenario_json(driving_limit: f64) -> String {
    format!(
        r#"{{
            "person": {{ "date_of_birth": "1990-03-14", "height": 1.70, "weight": 64.0, "sex": "female" }},
            "drinks": [
                {{ "name": "Gin and tonic", "volume": 0.25, "alc_prop": 0.08, "time": "2024-05-01T21:00:00Z", "sip_interval": 20 }}
            ],
            "foods": [
                {{ "name": "Crisps", "time": "2024-05-01T20:50:00Z", "category": "snack" }}
            ],
            "start": "2024-05-01T21:00:00Z",
            "end": "2024-05-02T01:00:00Z",
            "options": {{ "split_sips": true, "horizon": "trim_when_sober" }},
            "driving_limit": {driving_limit}
        }}"#
    )
}

#[test]
fn test_scenario_with_table_limit() {
    let limits = LegalLimits::from_reader(LIMITS.as_bytes()).unwrap();
    let limit = limits.limit("gb", DriverProfile::Regular).unwrap() / 100.0;
    let scenario = Scenario::from_json_str(&scenario_json(limit)).unwrap();
    assert!(scenario.person.age() >= 34);

    let report = scenario.run().unwrap();
    assert_eq!(report.results.len(), 5);
    assert!(report.results.errors().is_empty());

    let aggregated = report.aggregated.unwrap();
    let thresholds = report.thresholds.unwrap();
    assert!(thresholds.drive_safe_time.is_some());
    assert!(aggregated.len() < 240);
}

#[test]
fn test_missing_limit() {
    let limits = LegalLimits::from_reader(LIMITS.as_bytes()).unwrap();
    assert_eq!(limits.limit("GB", DriverProfile::Novice), None);
    assert_eq!(limits.limit("XX", DriverProfile::Regular), None);
    assert_eq!(
        "professional".parse::<DriverProfile>(),
        Ok(DriverProfile::Professional)
    );
}

#[test]
fn test_scenario_from_file_and_csv_export() {
    let dir = std::env::temp_dir().join(format!("bacflow-scenario-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scenario.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(scenario_json(0.0002).as_bytes()).unwrap();
    drop(file);

    let report = Scenario::from_path(&path).unwrap().run().unwrap();
    let series = report.results.series(Model::Seidl).unwrap();

    let mut buffer = Vec::new();
    series.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("time,bac,bac_perc"));
    assert!(lines.next().unwrap().starts_with("2024-05-01T21:00:00Z,"));
    assert_eq!(text.lines().count(), series.len() + 1);

    let mut buffer = Vec::new();
    report.aggregated.unwrap().write_csv(&mut buffer).unwrap();
    assert!(String::from_utf8(buffer)
        .unwrap()
        .starts_with("time,mean_bac,var_bac\n"));

    std::fs::remove_dir_all(&dir).unwrap();
}
