use super::*;

#[test]
fn parses_verify_command() {
    let cli = Cli::try_parse_from([
        "revkz-cli",
        "verify",
        "--city",
        "Алматы",
        "--address",
        "Сейфуллина 34",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Verify { city, address } => {
            assert_eq!(city, "Алматы");
            assert_eq!(address, "Сейфуллина 34");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn verify_requires_address() {
    let result = Cli::try_parse_from(["revkz-cli", "verify", "--city", "Алматы"]);
    assert!(result.is_err());
}

#[test]
fn parses_cities_command() {
    let cli = Cli::try_parse_from(["revkz-cli", "cities"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Cities));
}

#[test]
fn parses_phone_command_with_positional_number() {
    let cli = Cli::try_parse_from(["revkz-cli", "phone", "+7 701 123 45 67"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Phone { ref number } if number == "+7 701 123 45 67"
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["revkz-cli"]).is_err());
}
