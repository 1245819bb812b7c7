// SPDX-License-Identifier: MIT
//! Started/finished request counters.
//!
//! The pair is built from an injected [`Meter`] rather than held in a static, so a
//! test can hand in a meter backed by an in-memory exporter. Cloning is cheap and
//! every clone feeds the same instruments.
use opentelemetry::metrics::{Counter, Meter};

pub const STARTED_REQUEST_COUNTER: &str = "started_request_counter";
pub const FINISHED_REQUEST_COUNTER: &str = "finished_request_counter";

#[derive(Clone)]
pub struct RequestCounters {
    started: Counter<u64>,
    finished: Counter<u64>,
}

impl RequestCounters {
    pub fn new(meter: &Meter) -> Self {
        Self {
            started: meter
                .u64_counter(STARTED_REQUEST_COUNTER)
                .with_description("Units of work entered")
                .build(),
            finished: meter
                .u64_counter(FINISHED_REQUEST_COUNTER)
                .with_description("Units of work completed")
                .build(),
        }
    }

    pub fn started(&self) {
        self.started.add(1, &[]);
    }

    pub fn finished(&self) {
        self.finished.add(1, &[]);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory meter used to assert counter totals.
    use opentelemetry::metrics::{Meter, MeterProvider};
    use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData};
    use opentelemetry_sdk::metrics::{InMemoryMetricExporter, PeriodicReader, SdkMeterProvider};

    pub struct MeterProbe {
        provider: SdkMeterProvider,
        exporter: InMemoryMetricExporter,
    }

    impl MeterProbe {
        pub fn new() -> Self {
            let exporter = InMemoryMetricExporter::default();
            let provider = SdkMeterProvider::builder()
                .with_reader(PeriodicReader::builder(exporter.clone()).build())
                .build();
            Self { provider, exporter }
        }

        pub fn meter(&self) -> Meter {
            self.provider.meter("counter-tests")
        }

        /// Flush and return the cumulative total recorded under `name`.
        pub fn total(&self, name: &str) -> u64 {
            self.provider.force_flush().expect("flush meter provider");
            let exported = self.exporter.get_finished_metrics().expect("read exported metrics");
            // Cumulative temporality: the most recent export holds the running total.
            let Some(latest) = exported.last() else {
                return 0;
            };
            latest
                .scope_metrics()
                .flat_map(|scope| scope.metrics())
                .filter(|metric| metric.name() == name)
                .map(|metric| match metric.data() {
                    AggregatedMetrics::U64(MetricData::Sum(sum)) => {
                        sum.data_points().map(|point| point.value()).sum::<u64>()
                    }
                    _ => 0,
                })
                .sum()
        }
    }
}
