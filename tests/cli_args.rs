//! CLI argument parsing tests.

use clap::Parser;
use pdsapi::cli::{ClassArg, Cli, Command};
use pdsapi::ProductClass;

#[test]
fn test_cli_parses_search_subcommand() {
    let cli = Cli::parse_from([
        "pdsapi",
        "search",
        "--class",
        "collections",
        "--limit",
        "5",
        "saturn",
        "rings",
    ]);

    assert!(!cli.json);
    match cli.command {
        Command::Search {
            class,
            keywords,
            limit,
            query,
            ..
        } => {
            assert_eq!(class, ClassArg::Collection);
            assert_eq!(keywords, vec!["saturn", "rings"]);
            assert_eq!(limit, Some(5));
            assert!(query.is_none());
        }
        _ => panic!("Expected Search command"),
    }
}

#[test]
fn test_search_defaults_to_any_class() {
    let cli = Cli::parse_from(["pdsapi", "search", "-q", r#"(title like "pluto")"#]);

    match cli.command {
        Command::Search { class, query, .. } => {
            assert_eq!(ProductClass::from(class), ProductClass::Any);
            assert_eq!(query.as_deref(), Some(r#"(title like "pluto")"#));
        }
        _ => panic!("Expected Search command"),
    }
}

#[test]
fn test_search_splits_comma_lists() {
    let cli = Cli::parse_from([
        "pdsapi",
        "search",
        "--fields",
        "lid,title",
        "--search-after",
        "urn:nasa:pds:a::1.0",
        "--facets",
        "ref_lid_target",
    ]);

    match cli.command {
        Command::Search {
            fields,
            search_after,
            facets,
            ..
        } => {
            assert_eq!(fields, vec!["lid", "title"]);
            assert_eq!(search_after, vec!["urn:nasa:pds:a::1.0"]);
            assert_eq!(facets, vec!["ref_lid_target"]);
        }
        _ => panic!("Expected Search command"),
    }
}

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from([
        "pdsapi",
        "get",
        "urn:nasa:pds:context:target:planet.mars",
        "--all-versions",
    ]);

    match cli.command {
        Command::Get {
            identifier,
            all_versions,
        } => {
            assert_eq!(identifier, "urn:nasa:pds:context:target:planet.mars");
            assert!(all_versions);
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_members_subcommand() {
    let cli = Cli::parse_from([
        "pdsapi",
        "members",
        "urn:nasa:pds:cassini_iss_saturn:data_raw",
        "--parents",
        "--nested",
    ]);

    match cli.command {
        Command::Members {
            identifier,
            parents,
            nested,
            limit,
            all,
        } => {
            assert_eq!(identifier, "urn:nasa:pds:cassini_iss_saturn:data_raw");
            assert!(parents);
            assert!(nested);
            assert!(limit.is_none());
            assert!(!all);
        }
        _ => panic!("Expected Members command"),
    }
}

#[test]
fn test_members_all_conflicts_with_limit() {
    let result = Cli::try_parse_from([
        "pdsapi",
        "members",
        "urn:nasa:pds:a",
        "--all",
        "--limit",
        "5",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_cli_parses_links_and_serve() {
    let cli = Cli::parse_from(["pdsapi", "links", "urn:nasa:pds:a", "--members", "--limit", "3"]);
    match cli.command {
        Command::Links {
            members, limit, ..
        } => {
            assert!(members);
            assert_eq!(limit, Some(3));
        }
        _ => panic!("Expected Links command"),
    }

    let cli = Cli::parse_from(["pdsapi", "serve"]);
    assert!(matches!(cli.command, Command::Serve));
}

#[test]
fn test_global_flags() {
    // --json before subcommand
    let cli = Cli::parse_from(["pdsapi", "--json", "classes"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["pdsapi", "classes", "--json", "-v"]);
    assert!(cli.json);
    assert!(cli.verbose);

    let cli = Cli::parse_from(["pdsapi", "--api-url", "http://localhost:8080/api", "classes"]);
    assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080/api"));
}

#[test]
fn test_unknown_class_is_rejected() {
    let result = Cli::try_parse_from(["pdsapi", "search", "--class", "spacecraft"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_identifier_is_rejected() {
    assert!(Cli::try_parse_from(["pdsapi", "get"]).is_err());
}
