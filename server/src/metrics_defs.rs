//! Metric definitions for the update server.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

pub const PINGS_RECORDED: MetricDef = MetricDef {
    name: "pings.recorded",
    metric_type: MetricType::Counter,
    description: "Version-check pings persisted to the document store",
};

pub const STATS_AGGREGATIONS: MetricDef = MetricDef {
    name: "downloads.aggregations",
    metric_type: MetricType::Counter,
    description: "Successful download-stats aggregations served",
};

pub const REQUEST_FAILURES: MetricDef = MetricDef {
    name: "requests.failed",
    metric_type: MetricType::Counter,
    description: "Requests answered with a 500 after an upstream or store failure",
};

pub const ALL_METRICS: &[MetricDef] = &[PINGS_RECORDED, STATS_AGGREGATIONS, REQUEST_FAILURES];
