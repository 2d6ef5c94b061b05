// Copyright (c) Facebook, Inc. and its affiliates.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    base_types::Result,
    configuration::SimulationConfig,
    metrics::MetricsSummary,
};
use std::{fs, path::Path};

/// Renders a run report as CSV files under a result directory.
pub struct DataWriter {
    data_files_path: String,
}

impl DataWriter {
    pub fn new(path: String) -> DataWriter {
        let data_writer = DataWriter {
            data_files_path: path,
        };
        if !Path::new(&data_writer.data_files_path).exists() {
            fs::create_dir(&data_writer.data_files_path).expect("could not create result dir");
        }
        data_writer
    }

    /// Write `summary.csv` (one dated row with the configuration and every
    /// aggregate metric) and `sample_means.csv` (one row per sample).
    pub fn write_report(&self, config: &SimulationConfig, summary: &MetricsSummary) -> Result<()> {
        let mut wtr =
            csv::Writer::from_path(format!("{}/{}", self.data_files_path, "summary.csv"))?;
        wtr.serialize(vec![
            "date",
            "prob",
            "cache_size",
            "bandwidth",
            "signal_speed",
            "delay_variance",
            "hi_ttl",
            "mi_ttl",
            "samples",
            "run_time",
            "arrival_mean",
            "p_central",
            "interests",
            "deliveries",
            "hit_distance_mean",
            "hit_distance_variance",
            "return_time_mean",
            "return_time_variance",
            "hit_distance_sample_variance",
            "return_time_sample_variance",
            "hit_distance_pct_1",
            "hit_distance_pct_2",
            "hit_distance_pct_3",
            "hit_distance_pct_4",
            "hit_distance_pct_5",
            "cache_hit_ratio",
        ])?;
        let mut row = vec![
            chrono::Local::now().format("%Y-%m-%d_%H:%M:%S").to_string(),
            config.prob.to_string(),
            config.cache_size.to_string(),
            config.bandwidth.to_string(),
            config.signal_speed.to_string(),
            config.delay_variance.to_string(),
            config.hi_ttl.0.to_string(),
            config.mi_ttl.0.to_string(),
            config.samples.to_string(),
            config.run_time.0.to_string(),
            config.arrival_mean.to_string(),
            config.p_central.to_string(),
            summary.interests.to_string(),
            summary.deliveries.to_string(),
            summary.hit_distance_mean.to_string(),
            summary.hit_distance_variance.to_string(),
            summary.return_time_mean.to_string(),
            summary.return_time_variance.to_string(),
            summary.hit_distance_sample_variance.to_string(),
            summary.return_time_sample_variance.to_string(),
        ];
        for pct in summary.hit_distance_percentages.iter() {
            row.push(pct.to_string());
        }
        row.push(summary.cache_hit_ratio.to_string());
        wtr.serialize(row)?;
        wtr.flush()?;

        let mut wtr =
            csv::Writer::from_path(format!("{}/{}", self.data_files_path, "sample_means.csv"))?;
        wtr.serialize(vec!["sample", "hit_distance_mean", "return_time_mean"])?;
        for (sample, (hd, rt)) in summary
            .sample_hit_distance_means
            .iter()
            .zip(summary.sample_return_time_means.iter())
            .enumerate()
        {
            wtr.serialize((sample, hd, rt))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
