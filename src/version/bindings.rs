//! Latest validated bindings version lookup.
//!
//! Validated bindings releases are published as empty marker objects in a
//! public S3 bucket, keyed `<bindings_prefix>/<version>`. The lookup lists
//! every key starting with `<bindings_prefix>/<major.minor>.` and returns the
//! greatest version. The trailing dot keeps `3.1` from matching `3.10`.
//!
//! Versions are compared as plain strings, so `3.1.2` beats `3.1.10`. The
//! published versions carry fixed-width timestamps in the patch position,
//! which keeps string order and release order identical for them.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::Url;

use crate::config::InstallerConfig;
use crate::error::{InstallError, Result};

use super::local::{read_local_version, LocalVersion};

static KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Key>([^<]*)</Key>").expect("KEY_REGEX must compile"));

static TRUNCATED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<IsTruncated>\s*(true|false)\s*</IsTruncated>")
        .expect("TRUNCATED_REGEX must compile")
});

static NEXT_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<NextMarker>([^<]*)</NextMarker>").expect("NEXT_MARKER_REGEX must compile")
});

/// Lists object keys in a bucket.
pub trait BucketLister {
    /// Every key starting with `prefix`, across all pages.
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Public URL of the bucket, for error messages.
    fn bucket_url(&self) -> String;
}

/// One page of an S3 ListObjects response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
}

/// Parse a ListObjects (v1) XML document.
pub fn parse_list_page(xml: &str) -> ListPage {
    let keys = KEY_REGEX
        .captures_iter(xml)
        .map(|c| unescape_xml(&c[1]))
        .collect();

    let is_truncated = TRUNCATED_REGEX
        .captures(xml)
        .is_some_and(|c| &c[1] == "true");

    let next_marker = NEXT_MARKER_REGEX
        .captures(xml)
        .map(|c| unescape_xml(&c[1]))
        .filter(|m| !m.is_empty());

    ListPage {
        keys,
        is_truncated,
        next_marker,
    }
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Anonymous, read-only S3 bucket listing over HTTP.
pub struct S3BucketLister {
    client: Client,
    bucket_url: String,
}

impl S3BucketLister {
    /// Create a lister for the bucket named in `config` with a 30-second timeout.
    pub fn new(config: &InstallerConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(30))
    }

    /// Create a lister with a custom timeout.
    pub fn with_timeout(config: &InstallerConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("deepdrive-install/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| InstallError::Http {
                url: config.bucket_url(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            bucket_url: config.bucket_url(),
        })
    }

    fn fetch_page(&self, prefix: &str, marker: &str) -> Result<ListPage> {
        let http_error = |message: String| InstallError::Http {
            url: self.bucket_url.clone(),
            message,
        };

        let url = Url::parse_with_params(&self.bucket_url, &[("prefix", prefix), ("marker", marker)])
            .map_err(|e| http_error(e.to_string()))?;

        tracing::debug!("Listing {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| http_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(http_error(format!("HTTP {}", response.status())));
        }

        let body = response.text().map_err(|e| http_error(e.to_string()))?;
        Ok(parse_list_page(&body))
    }
}

impl BucketLister for S3BucketLister {
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut marker = String::new();

        loop {
            let page = self.fetch_page(prefix, &marker)?;
            let last_key = page.keys.last().cloned();
            keys.extend(page.keys);

            if !page.is_truncated {
                break;
            }
            match page.next_marker.or(last_key) {
                Some(next) if next != marker => marker = next,
                _ => break,
            }
        }

        Ok(keys)
    }

    fn bucket_url(&self) -> String {
        self.bucket_url.clone()
    }
}

/// Listing prefix for bindings compatible with `local`.
pub fn bindings_search_prefix(config: &InstallerConfig, local: &LocalVersion) -> String {
    format!("{}/{}.", config.bindings_prefix, local.major_minor_str)
}

/// Pick the greatest version among listed keys.
///
/// The version is the second `/`-separated segment of each key. Keys
/// without one are ignored. Ordering is plain string ordering.
pub fn select_latest<S: AsRef<str>>(keys: &[S]) -> Option<String> {
    keys.iter()
        .filter_map(|key| key.as_ref().split('/').nth(1))
        .filter(|version| !version.is_empty())
        .max()
        .map(str::to_string)
}

/// Resolve the latest validated bindings version for a known local version.
///
/// # Errors
///
/// Returns `NoCompatibleVersion` when nothing is listed under the prefix.
pub fn latest_compatible_version(
    config: &InstallerConfig,
    local: &LocalVersion,
    lister: &dyn BucketLister,
) -> Result<String> {
    let prefix = bindings_search_prefix(config, local);
    let keys = lister.list_keys(&prefix)?;
    tracing::debug!("Found {} bindings keys under {}", keys.len(), prefix);

    select_latest(&keys).ok_or_else(|| InstallError::NoCompatibleVersion {
        prefix,
        bucket_url: lister.bucket_url(),
    })
}

/// Read the local VERSION and resolve the latest validated bindings version.
pub fn fetch_latest_compatible_binding_version(
    config: &InstallerConfig,
    lister: &dyn BucketLister,
) -> Result<String> {
    let local = read_local_version(config)?;
    latest_compatible_version(config, &local, lister)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;

    struct StaticLister(Vec<&'static str>);

    impl BucketLister for StaticLister {
        fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .0
                .iter()
                .filter(|k| k.starts_with(prefix))
                .map(|k| k.to_string())
                .collect())
        }

        fn bucket_url(&self) -> String {
            "https://example.invalid/deepdrive".to_string()
        }
    }

    fn config() -> InstallerConfig {
        InstallerConfig::with_env("/opt/deepdrive", HashMap::new())
    }

    fn local() -> LocalVersion {
        LocalVersion::parse("3.1.20210202221642").unwrap()
    }

    fn list_xml(keys: &[&str], truncated: bool) -> String {
        let contents: String = keys
            .iter()
            .map(|k| format!("<Contents><Key>{}</Key><Size>0</Size></Contents>", k))
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"><Name>deepdrive</Name><IsTruncated>{}</IsTruncated>{}</ListBucketResult>",
            truncated, contents
        )
    }

    #[test]
    fn selection_is_lexicographic() {
        let keys = [
            "validated-bindings-versions/3.1.1",
            "validated-bindings-versions/3.1.10",
            "validated-bindings-versions/3.1.2",
        ];
        assert_eq!(select_latest(&keys).as_deref(), Some("3.1.2"));
    }

    #[test]
    fn selection_ignores_keys_without_version() {
        let keys = ["validated-bindings-versions", "validated-bindings-versions/"];
        assert_eq!(select_latest(&keys), None);
    }

    #[test]
    fn search_prefix_uses_major_minor() {
        assert_eq!(
            bindings_search_prefix(&config(), &local()),
            "validated-bindings-versions/3.1."
        );
    }

    #[test]
    fn latest_compatible_filters_by_prefix() {
        let lister = StaticLister(vec![
            "validated-bindings-versions/3.0.20190101000000",
            "validated-bindings-versions/3.1.20200101000000",
            "validated-bindings-versions/3.1.20210202221642",
        ]);
        let version = latest_compatible_version(&config(), &local(), &lister).unwrap();
        assert_eq!(version, "3.1.20210202221642");
    }

    #[test]
    fn later_minor_with_shared_digits_is_not_compatible() {
        let lister = StaticLister(vec![
            "validated-bindings-versions/3.1.20210202221642",
            "validated-bindings-versions/3.10.20220101000000",
        ]);
        let version = latest_compatible_version(&config(), &local(), &lister).unwrap();
        assert_eq!(version, "3.1.20210202221642");
    }

    #[test]
    fn only_later_minor_listed_is_no_compatible_version() {
        let lister = StaticLister(vec!["validated-bindings-versions/3.10.20220101000000"]);
        let err = latest_compatible_version(&config(), &local(), &lister).unwrap_err();
        assert!(matches!(err, InstallError::NoCompatibleVersion { .. }));
    }

    #[test]
    fn empty_listing_is_no_compatible_version() {
        let lister = StaticLister(vec!["validated-bindings-versions/3.0.1"]);
        let err = latest_compatible_version(&config(), &local(), &lister).unwrap_err();
        match err {
            InstallError::NoCompatibleVersion { prefix, bucket_url } => {
                assert_eq!(prefix, "validated-bindings-versions/3.1.");
                assert!(bucket_url.ends_with("/deepdrive"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_list_page_reads_keys_and_truncation() {
        let page = parse_list_page(&list_xml(&["a/1", "a/2&amp;b"], true));
        assert_eq!(page.keys, vec!["a/1", "a/2&b"]);
        assert!(page.is_truncated);
        assert_eq!(page.next_marker, None);
    }

    #[test]
    fn parse_list_page_reads_next_marker() {
        let xml = "<ListBucketResult><IsTruncated>true</IsTruncated><NextMarker>a/9</NextMarker></ListBucketResult>";
        assert_eq!(parse_list_page(xml).next_marker.as_deref(), Some("a/9"));
    }

    #[test]
    fn s3_lister_lists_single_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/deepdrive")
                .query_param("prefix", "validated-bindings-versions/3.1");
            then.status(200).body(list_xml(
                &[
                    "validated-bindings-versions/3.1.20200101000000",
                    "validated-bindings-versions/3.1.20210202221642",
                ],
                false,
            ));
        });

        let mut config = config();
        config.bucket_endpoint = server.base_url();
        let lister = S3BucketLister::new(&config).unwrap();

        let version = latest_compatible_version(&config, &local(), &lister).unwrap();
        mock.assert();
        assert_eq!(version, "3.1.20210202221642");
    }

    #[test]
    fn s3_lister_follows_truncated_pages() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/deepdrive")
                .query_param("marker", "");
            then.status(200)
                .body(list_xml(&["validated-bindings-versions/3.1.1"], true));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/deepdrive")
                .query_param("marker", "validated-bindings-versions/3.1.1");
            then.status(200)
                .body(list_xml(&["validated-bindings-versions/3.1.2"], false));
        });

        let mut config = config();
        config.bucket_endpoint = server.base_url();
        let lister = S3BucketLister::new(&config).unwrap();

        let keys = lister.list_keys("validated-bindings-versions/3.1").unwrap();
        first.assert();
        second.assert();
        assert_eq!(
            keys,
            vec![
                "validated-bindings-versions/3.1.1",
                "validated-bindings-versions/3.1.2"
            ]
        );
    }

    #[test]
    fn s3_lister_reports_http_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/deepdrive");
            then.status(403).body("<Error><Code>AccessDenied</Code></Error>");
        });

        let mut config = config();
        config.bucket_endpoint = server.base_url();
        let lister = S3BucketLister::new(&config).unwrap();

        let err = lister.list_keys("validated-bindings-versions/3.1").unwrap_err();
        assert!(matches!(err, InstallError::Http { .. }));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn fetch_reads_local_version_first() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("VERSION"), "3.1.20210202221642\n").unwrap();
        let config = InstallerConfig::with_env(temp.path(), HashMap::new());
        let lister = StaticLister(vec![
            "validated-bindings-versions/3.1.1",
            "validated-bindings-versions/3.1.10",
            "validated-bindings-versions/3.1.2",
        ]);

        let version = fetch_latest_compatible_binding_version(&config, &lister).unwrap();
        assert_eq!(version, "3.1.2");
    }
}
