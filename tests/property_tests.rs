//! Property-based tests for netsift using proptest
//!
//! These tests generate random inputs to check extraction invariants and make
//! sure the binary never crashes on arbitrary text.

use assert_cmd::prelude::*;
use netsift::{extract_ips, extract_urls};
use proptest::prelude::*;
use std::collections::HashSet;
use std::io::Write;
use std::net::Ipv4Addr;
use std::process::Command;
use tempfile::NamedTempFile;

const NAME: &str = "netsift";

fn ipv4_strategy() -> impl Strategy<Value = Ipv4Addr> {
    any::<[u8; 4]>().prop_map(Ipv4Addr::from)
}

/// Fragments that look like identifiers, or almost do
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        ipv4_strategy().prop_map(|ip| ip.to_string()),
        (ipv4_strategy(), 1u16..65535).prop_map(|(ip, port)| format!("{ip} port:{port}")),
        r"[a-z]{3,10}".prop_map(|name| format!("http://{name}.com/path")),
        r"[a-z]{3,10}".prop_map(|name| format!("www.{name}.net")),
        r"[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}\.[0-9]{1,4}",
        Just("v1.2.3.4.5".to_string()),
        Just("http://".to_string()),
        Just("，、".to_string()),
        r"[a-zA-Z ]{0,20}",
    ]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (fragment_strategy(), prop_oneof![Just(" "), Just(", "), Just("\n"), Just("，")]),
        0..12,
    )
    .prop_map(|parts| {
        parts
            .into_iter()
            .map(|(fragment, sep)| fragment + sep)
            .collect()
    })
}

proptest! {
    #[test]
    fn test_extraction_is_deterministic(text in text_strategy()) {
        let first: HashSet<String> = extract_urls(&text).into_iter().collect();
        let second: HashSet<String> = extract_urls(&text).into_iter().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_extracted_items_are_unique(text in text_strategy()) {
        let urls = extract_urls(&text);
        let unique: HashSet<&String> = urls.iter().collect();
        prop_assert_eq!(unique.len(), urls.len());

        let ips = extract_ips(&text);
        let unique: HashSet<&String> = ips.iter().collect();
        prop_assert_eq!(unique.len(), ips.len());
    }

    #[test]
    fn test_extracted_ips_are_canonical_addresses(text in text_strategy()) {
        for ip in extract_ips(&text) {
            let parsed: Ipv4Addr = ip.parse().expect("extracted IP should parse");
            prop_assert_eq!(parsed.to_string(), ip.clone());
            prop_assert!(text.contains(&ip));
        }
    }

    #[test]
    fn test_extracted_urls_have_http_scheme(text in text_strategy()) {
        for url in extract_urls(&text) {
            prop_assert!(url.starts_with("http://") || url.starts_with("https://"), "{}", url);
            prop_assert!(!url.ends_with(','));
        }
    }

    #[test]
    fn test_standalone_ip_is_found(ip in ipv4_strategy(), port in 1u16..65535) {
        let text = format!("Server at {ip} port:{port} is up");

        prop_assert_eq!(extract_ips(&text), vec![ip.to_string()]);
        let expected = format!("http://{ip}:{port}");
        prop_assert!(extract_urls(&text).contains(&expected));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))] // Each case spawns the binary

    #[test]
    fn test_binary_handles_random_text(content in text_strategy()) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let dir = tempfile::TempDir::new().unwrap();

        let mut cmd = Command::cargo_bin(NAME).unwrap();
        cmd.arg(file.path())
            .arg("--mode")
            .arg("url")
            .arg("--no-check")
            .arg("--no-config")
            .arg("-q")
            .arg("-o")
            .arg(dir.path().join("out.txt"));

        // Extraction only: always exits 0, including "nothing to do"
        cmd.assert().success();
    }
}
