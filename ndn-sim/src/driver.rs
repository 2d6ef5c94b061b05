// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::{scenario::Scenario, world::World};
use log::info;
use ndn_lib::{
    base_types::{Result, SimTime},
    configuration::SimulationConfig,
    metrics::MetricsSummary,
    DataWriter,
};

/// Run `config.samples` independent samples over one scenario and
/// aggregate the measurements. Content stores and the cache census reset
/// at every sample boundary; packets still in flight carry over.
pub fn run(
    scenario: &Scenario,
    config: &SimulationConfig,
    seed: u64,
    writer: Option<&DataWriter>,
) -> Result<MetricsSummary> {
    let mut world = World::new(scenario, config.clone(), seed)?;
    world.start_traffic();
    let mut deadline = SimTime::ZERO;
    for sample in 0..config.samples {
        world.begin_sample();
        deadline = deadline + config.run_time;
        info!("Sample {} running until {:?}", sample, deadline);
        world.run_until(deadline)?;
        world.reset_content_stores();
    }
    let summary = world.report();
    if let Some(writer) = writer {
        writer.write_report(config, &summary)?;
    }
    Ok(summary)
}
