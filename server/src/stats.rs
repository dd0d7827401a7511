use serde::Serialize;

use crate::github::Release;

/// Base token every first-party asset filename carries. Names without it
/// come from forks or manual uploads and count as [`Platform::Other`].
const PRODUCT_TOKEN: &str = "obs-ndi";

const WINDOWS_TOKENS: &[&str] = &["win"];
const MACOS_TOKENS: &[&str] = &["mac", "dmg"];
const LINUX_TOKENS: &[&str] = &["deb"];

/// Platform bucket an asset's download count is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Macos,
    Linux,
    Other,
}

/// Classify a release asset into a platform bucket by filename.
///
/// Matching is case-insensitive and ordered: the product token gates the
/// platform checks, then `win`, then `mac`/`dmg`, then `deb`. A name that
/// carries the product token but no platform token (source tarballs,
/// checksum files) still counts as `Other`, so bucket sums stay equal to
/// the total.
pub fn classify_asset(filename: &str) -> Platform {
    let name = filename.to_ascii_lowercase();

    if !name.contains(PRODUCT_TOKEN) {
        return Platform::Other;
    }
    if WINDOWS_TOKENS.iter().any(|token| name.contains(token)) {
        return Platform::Windows;
    }
    if MACOS_TOKENS.iter().any(|token| name.contains(token)) {
        return Platform::Macos;
    }
    if LINUX_TOKENS.iter().any(|token| name.contains(token)) {
        return Platform::Linux;
    }
    Platform::Other
}

/// Accumulated download counts for one scope. `total` is maintained
/// alongside the buckets and always equals their sum.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PlatformCounts {
    pub windows: u64,
    pub macos: u64,
    pub linux: u64,
    pub other: u64,
    pub total: u64,
}

impl PlatformCounts {
    fn record(&mut self, platform: Platform, downloads: u64) {
        let bucket = match platform {
            Platform::Windows => &mut self.windows,
            Platform::Macos => &mut self.macos,
            Platform::Linux => &mut self.linux,
            Platform::Other => &mut self.other,
        };
        *bucket += downloads;
        self.total += downloads;
    }

    fn percentages(&self) -> PlatformPercentages {
        PlatformPercentages {
            windows: format_share(self.windows, self.total),
            macos: format_share(self.macos, self.total),
            linux: format_share(self.linux, self.total),
            other: format_share(self.other, self.total),
        }
    }
}

/// Per-bucket share of the scope total, rendered with two decimal places
/// and a trailing `%`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlatformPercentages {
    pub windows: String,
    pub macos: String,
    pub linux: String,
    pub other: String,
}

/// `count` as a share of `total`. A zero total renders `0.00%` for every
/// bucket instead of dividing by zero.
fn format_share(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", count as f64 / total as f64 * 100.0)
}

/// Pair of values covering the whole release history and the newest
/// release only.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScopedStats<T> {
    pub all_versions: T,
    pub latest_version: T,
}

/// Response payload of the downloads endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStats {
    pub download_counts: ScopedStats<PlatformCounts>,
    pub percentages: ScopedStats<PlatformPercentages>,
}

/// Aggregate download counts across `releases`, assumed newest-first as
/// the upstream API returns them; the element at index 0 feeds the
/// latest-version scope. An empty list yields all-zero counts.
pub fn aggregate(releases: &[Release]) -> DownloadStats {
    let mut all_versions = PlatformCounts::default();
    let mut latest_version = PlatformCounts::default();

    for (index, release) in releases.iter().enumerate() {
        for asset in &release.assets {
            let platform = classify_asset(&asset.name);
            all_versions.record(platform, asset.download_count);
            if index == 0 {
                latest_version.record(platform, asset.download_count);
            }
        }
    }

    DownloadStats {
        percentages: ScopedStats {
            all_versions: all_versions.percentages(),
            latest_version: latest_version.percentages(),
        },
        download_counts: ScopedStats {
            all_versions,
            latest_version,
        },
    }
}
