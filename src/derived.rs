//! Derived metrics: throughput, latency, cache efficiency and queueing.
//!
//! Every metric is computed from a [`DeltaReport`] and the final sample's
//! values. A metric whose source statistic is missing (older or newer server
//! versions expose different counters) is left out of the result. Ratios
//! declare their guard explicitly through [`guarded`]: a non-positive
//! denominator yields `0`, never NaN or infinity.

use std::iter;

use serverstat_types::{DeltaReport, DerivedMetrics, FlatStats};
use tracing::debug;

/// Bytes per kilobyte, as used by the network and log rates.
const KB: f64 = 1024.0;
/// Bytes per megabyte, as used by the cache size metrics.
const MB: f64 = 1_048_576.0;

const NET_BYTES_IN: &str = "network.bytesIn";
const NET_BYTES_OUT: &str = "network.bytesOut";

const OPS_QUERY: &str = "opcounters.query";
const OPS_GETMORE: &str = "opcounters.getmore";
const OPS_COMMAND: &str = "opcounters.command";
const OPS_INSERT: &str = "opcounters.insert";
const OPS_UPDATE: &str = "opcounters.update";
const OPS_DELETE: &str = "opcounters.delete";

const DOCS_RETURNED: &str = "metrics.document.returned";
const DOCS_UPDATED: &str = "metrics.document.updated";
const DOCS_INSERTED: &str = "metrics.document.inserted";
const IXSCAN_DOCS: &str = "metrics.queryExecutor.scanned";
const COLLSCAN_DOCS: &str = "metrics.queryExecutor.scannedObjects";

const TXN_STARTED: &str = "transactions.totalStarted";
const TXN_ABORTED: &str = "transactions.totalAborted";
const TXN_COMMITTED: &str = "transactions.totalCommitted";

const CONN_CURRENT: &str = "connections.current";
const CONN_AVAILABLE: &str = "connections.available";

const ASSERTS: [&str; 5] = [
    "asserts.regular",
    "asserts.warning",
    "asserts.msg",
    "asserts.user",
    "asserts.rollovers",
];

const ACTIVE_READERS: &str = "globalLock.activeClients.readers";
const ACTIVE_WRITERS: &str = "globalLock.activeClients.writers";
const QUEUED_READERS: &str = "globalLock.currentQueue.readers";
const QUEUED_WRITERS: &str = "globalLock.currentQueue.writers";

const READ_TICKETS_AVAILABLE: &str = "wiredTiger.concurrentTransactions.read.available";
const READ_TICKETS_OUT: &str = "wiredTiger.concurrentTransactions.read.out";
const WRITE_TICKETS_AVAILABLE: &str = "wiredTiger.concurrentTransactions.write.available";
const WRITE_TICKETS_OUT: &str = "wiredTiger.concurrentTransactions.write.out";

const CACHE_GETS: &str = "wiredTiger.cache.pages requested from the cache";
const CACHE_READ_INS: &str = "wiredTiger.cache.pages read into cache";
const CACHE_EVICTIONS: &str = "wiredTiger.cache.eviction server evicting pages";
const EVICTION_BLOCKED: &str = "wiredTiger.thread-yield.page acquire eviction blocked";
const CACHE_MAX_BYTES: &str = "wiredTiger.cache.maximum bytes configured";
const CACHE_CURRENT_BYTES: &str = "wiredTiger.cache.bytes currently in the cache";

const BLOCKS_READ: &str = "wiredTiger.block-manager.blocks read";
const BLOCKS_WRITTEN: &str = "wiredTiger.block-manager.blocks written";
const LOG_BYTES_WRITTEN: &str = "wiredTiger.log.log bytes written";
const LOG_SYNC_USECS: &str = "wiredTiger.log.log sync time duration (usecs)";
const LOG_SYNC_OPS: &str = "wiredTiger.log.log sync operations";

/// Alternative names of a statistic on other server versions.
///
/// Lookups try the canonical key first, then each alias in order.
pub const KEY_ALIASES: &[(&str, &[&str])] = &[
    (
        CACHE_EVICTIONS,
        &[
            "wiredTiger.cache.internal pages evicted",
            "wiredTiger.cache.eviction worker thread evicting pages",
        ],
    ),
    (ACTIVE_READERS, &["globalLock.active.readers"]),
    (ACTIVE_WRITERS, &["globalLock.active.writers"]),
];

/// The canonical key followed by its aliases.
pub fn key_candidates(key: &str) -> impl Iterator<Item = &str> {
    let aliases: &[&str] = KEY_ALIASES
        .iter()
        .find(|(canonical, _)| *canonical == key)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[]);
    iter::once(key).chain(aliases.iter().copied())
}

/// `numerator / denominator`, or `0` when the denominator is not positive.
///
/// Missing inputs propagate as `None` so the metric is omitted.
pub fn guarded(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (numerator, denominator) = (numerator?, denominator?);
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        Some(0.0)
    }
}

/// Round values with a fractional part above 0.01 to four decimals.
///
/// Integral values (and negative values) pass through unchanged.
pub fn round_metric(value: f64) -> f64 {
    if value % 1.0 > 0.01 {
        (value * 10_000.0).round() / 10_000.0
    } else {
        value
    }
}

/// Compute the derived metrics for one monitoring interval.
pub fn derive(deltas: &DeltaReport, finals: &FlatStats) -> DerivedMetrics {
    let mut d = Derivation {
        deltas,
        finals,
        out: DerivedMetrics::new(),
    };

    d.put("intervalSeconds", Some(deltas.time_delta));

    // Network
    d.put("netKBInPS", d.rate(NET_BYTES_IN).map(|r| r / KB));
    d.put("netKBOutPS", d.rate(NET_BYTES_OUT).map(|r| r / KB));

    // Operations
    d.put("queryPS", d.rate(OPS_QUERY));
    d.put("getmorePS", d.rate(OPS_GETMORE));
    d.put("commandPS", d.rate(OPS_COMMAND));
    d.put("insertPS", d.rate(OPS_INSERT));
    d.put("updatePS", d.rate(OPS_UPDATE));
    d.put("deletePS", d.rate(OPS_DELETE));

    // Documents and scans
    d.put("docsReturnedPS", d.rate(DOCS_RETURNED));
    d.put("docsUpdatedPS", d.rate(DOCS_UPDATED));
    d.put("docsInsertedPS", d.rate(DOCS_INSERTED));
    d.put("ixscanDocsPS", d.rate(IXSCAN_DOCS));
    d.put("collscanDocsPS", d.rate(COLLSCAN_DOCS));
    let scanned = sum([d.get("ixscanDocsPS"), d.get("collscanDocsPS")]);
    d.put(
        "scansToDocumentRatio",
        guarded(scanned, d.get("docsReturnedPS")),
    );
    d.put(
        "ixscanPct",
        guarded(d.get("ixscanDocsPS").map(|v| v * 100.0), scanned),
    );

    // Transactions
    d.put("transactionsStartedPS", d.rate(TXN_STARTED));
    d.put("transactionsAbortedPS", d.rate(TXN_ABORTED));
    d.put("transactionsCommittedPS", d.rate(TXN_COMMITTED));
    d.put(
        "transactionAbortPct",
        guarded(
            d.get("transactionsAbortedPS").map(|v| v * 100.0),
            d.get("transactionsStartedPS"),
        ),
    );

    // Latency: opLatencies report cumulative microseconds per op class
    for (name, class) in [
        ("readLatencyMs", "reads"),
        ("writeLatencyMs", "writes"),
        ("cmdLatencyMs", "commands"),
    ] {
        let latency = d.delta(&format!("opLatencies.{}.latency", class));
        let ops = d.delta(&format!("opLatencies.{}.ops", class));
        d.put(name, guarded(latency.map(|us| us / 1000.0), ops));
    }

    // Connections
    d.put("connections", d.last(CONN_CURRENT));
    d.put("availableConnections", d.first(CONN_AVAILABLE));
    d.put(
        "connectionsInUsePct",
        guarded(
            d.get("connections").map(|v| v * 100.0),
            sum([d.get("connections"), d.get("availableConnections")]),
        ),
    );

    let asserts = sum(ASSERTS.map(|key| d.rate(key)));
    d.put("assertsPS", asserts);

    // Global lock queues
    d.put("activeReaders", d.final_value(ACTIVE_READERS));
    d.put("activeWriters", d.final_value(ACTIVE_WRITERS));
    d.put("queuedReaders", d.final_value(QUEUED_READERS));
    d.put("queuedWriters", d.final_value(QUEUED_WRITERS));
    let queued = sum([d.get("queuedReaders"), d.get("queuedWriters")]);
    let active = sum([d.get("activeReaders"), d.get("activeWriters")]);
    d.put(
        "queuedPct",
        guarded(queued.map(|v| v * 100.0), sum([queued, active])),
    );

    // WiredTiger tickets
    d.put("cacheReadQAvailable", d.last(READ_TICKETS_AVAILABLE));
    d.put("cacheReadQUsed", d.last(READ_TICKETS_OUT));
    d.put("cacheWriteQAvailable", d.last(WRITE_TICKETS_AVAILABLE));
    d.put("cacheWriteQUsed", d.last(WRITE_TICKETS_OUT));
    for (pct, used, available) in [
        ("cacheReadQUsedPct", "cacheReadQUsed", "cacheReadQAvailable"),
        ("cacheWriteQUsedPct", "cacheWriteQUsed", "cacheWriteQAvailable"),
    ] {
        let used = d.get(used);
        d.put(
            pct,
            guarded(used.map(|v| v * 100.0), sum([used, d.get(available)])),
        );
    }

    // WiredTiger cache
    d.put("cacheGetsPS", d.rate(CACHE_GETS));
    d.put("cacheReadInsPS", d.rate(CACHE_READ_INS));
    let gets = d.get("cacheGetsPS");
    let read_ins = d.get("cacheReadInsPS");
    let hits = gets.zip(read_ins).map(|(g, r)| (g - r) * 100.0);
    d.put("wtHitRate", guarded(hits, gets));
    d.put("cacheHitRate", d.get("wtHitRate"));

    d.put("evictionsPs", d.rate(CACHE_EVICTIONS));
    d.put("evictionBlockedPs", d.rate(EVICTION_BLOCKED));
    let evictions = d.get("evictionsPs");
    d.put(
        "evictionBlockRate",
        guarded(d.get("evictionBlockedPs").map(|v| v * 100.0), evictions),
    );
    d.put(
        "evictionRate",
        guarded(evictions.map(|v| v * 100.0), read_ins),
    );

    d.put("cacheHighWaterMB", d.last(CACHE_MAX_BYTES).map(|b| b / MB));
    d.put("cacheSizeMB", d.last(CACHE_CURRENT_BYTES).map(|b| b / MB));

    // Disk and journal
    d.put("diskBlockReadsPS", d.rate(BLOCKS_READ));
    d.put("diskBlockWritesPS", d.rate(BLOCKS_WRITTEN));
    d.put("logKBRatePS", d.rate(LOG_BYTES_WRITTEN).map(|r| r / KB));
    d.put(
        "logSyncTimeRateMsPS",
        d.rate(LOG_SYNC_USECS).map(|r| r / 1000.0),
    );
    d.put("logSyncOpsPS", d.rate(LOG_SYNC_OPS));
    d.put(
        "logAvgSyncTime",
        guarded(d.get("logSyncTimeRateMsPS"), d.get("logSyncOpsPS")),
    );

    d.finish()
}

/// Sum of values, `None` if any is missing.
fn sum<const N: usize>(values: [Option<f64>; N]) -> Option<f64> {
    values.into_iter().sum()
}

struct Derivation<'a> {
    deltas: &'a DeltaReport,
    finals: &'a FlatStats,
    out: DerivedMetrics,
}

impl Derivation<'_> {
    fn entry(&self, key: &str) -> Option<&serverstat_types::DeltaEntry> {
        key_candidates(key).find_map(|k| self.deltas.get(k))
    }

    fn rate(&self, key: &str) -> Option<f64> {
        self.entry(key)?.rate
    }

    fn delta(&self, key: &str) -> Option<f64> {
        self.entry(key)?.delta
    }

    fn last(&self, key: &str) -> Option<f64> {
        self.entry(key)?.last_value.as_f64()
    }

    fn first(&self, key: &str) -> Option<f64> {
        self.entry(key)?.first_value.as_ref()?.as_f64()
    }

    fn final_value(&self, key: &str) -> Option<f64> {
        key_candidates(key).find_map(|k| self.finals.get(k).and_then(|v| v.as_f64()))
    }

    /// A metric computed earlier in this derivation.
    fn get(&self, name: &str) -> Option<f64> {
        self.out.get(name)
    }

    fn put(&mut self, name: &str, value: Option<f64>) {
        match value {
            Some(value) => self.out.insert(name, value),
            None => debug!(metric = name, "source statistic missing; metric omitted"),
        }
    }

    fn finish(self) -> DerivedMetrics {
        let mut out = self.out;
        for value in out.values.values_mut() {
            *value = round_metric(*value);
        }
        out
    }
}
