use foodmap_core::PermitStatus;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["foodmap"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(!cli.json);
}

#[test]
fn parses_name_with_repeated_status() {
    let cli = Cli::try_parse_from([
        "foodmap", "name", "tacos", "--status", "approved", "--status", "EXPIRED",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Name { ref query, ref statuses })
            if query == "tacos"
                && statuses == &[PermitStatus::Approved, PermitStatus::Expired]
    ));
}

#[test]
fn parses_name_without_status() {
    let cli = Cli::try_parse_from(["foodmap", "name", "curry"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Name { ref statuses, .. }) if statuses.is_empty()
    ));
}

#[test]
fn blank_status_is_rejected() {
    assert!(Cli::try_parse_from(["foodmap", "name", "tacos", "--status", "  "]).is_err());
}

#[test]
fn parses_street() {
    let cli = Cli::try_parse_from(["foodmap", "street", "Market St"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Street { ref query }) if query == "Market St"
    ));
}

#[test]
fn parses_closest_with_negative_longitude() {
    let cli = Cli::try_parse_from([
        "foodmap", "closest", "--lat", "37.77", "--lng", "-122.41", "--limit", "3",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Closest {
            limit: Some(3),
            ref statuses,
            ..
        }) if statuses.is_empty()
    ));
    if let Some(Commands::Closest { lat, lng, .. }) = cli.command {
        assert!((lat - 37.77).abs() < f64::EPSILON);
        assert!((lng + 122.41).abs() < f64::EPSILON);
    }
}

#[test]
fn closest_requires_both_coordinates() {
    assert!(Cli::try_parse_from(["foodmap", "closest", "--lat", "37.77"]).is_err());
}

#[test]
fn parses_status_listing() {
    let cli = Cli::try_parse_from(["foodmap", "status", "--status", "suspend"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Status { ref statuses }) if statuses == &[PermitStatus::Suspend]
    ));
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["foodmap", "street", "Mission", "--json"]).unwrap();
    assert!(cli.json);
}

#[test]
fn base_url_override_is_parsed() {
    let cli = Cli::try_parse_from([
        "foodmap",
        "--base-url",
        "http://127.0.0.1:9000",
        "status",
    ])
    .unwrap();
    assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:9000"));
}
