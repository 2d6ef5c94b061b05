// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

//! Main executable to run a simulation of an NDN overlay.

use clap::{App, Arg};
use log::{info, warn};
use ndn_lib::{
    base_types::{Duration, Result},
    configuration::{CacheResetPolicy, DataSizing, SimulationConfig},
    DataWriter,
};
use ndn_sim::{driver, scenario, scenario::Scenario};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

fn main() -> Result<()> {
    let args = get_arguments();

    env_logger::init();
    let config = SimulationConfig {
        prob: args.prob,
        cache_size: args.cache_size,
        bandwidth: args.bandwidth,
        signal_speed: args.signal_speed,
        delay_variance: args.delay_variance,
        hi_ttl: Duration(args.hi_ttl),
        mi_ttl: Duration(args.mi_ttl),
        samples: args.samples,
        run_time: Duration(args.run_time),
        arrival_mean: args.arrival_mean,
        p_central: args.p_central,
        data_sizing: if args.depth_scaled_sizes {
            DataSizing::DepthScaled
        } else {
            DataSizing::Jittered {
                base_bits: 2000.0,
                jitter_bits: 200.0,
            }
        },
        cache_reset: if args.prefill_caches {
            CacheResetPolicy::Prefill
        } else {
            CacheResetPolicy::Clear
        },
    };
    let scenario = match args.scenario {
        Some(path) => Scenario::load(&path)?,
        None => scenario::fleet(&mut Xoshiro256StarStar::seed_from_u64(args.seed)),
    };
    let writer = args.output_data_files.map(DataWriter::new);
    let summary = driver::run(&scenario, &config, args.seed, writer.as_ref())?;
    warn!("Average cache hit ratio: {}", summary.cache_hit_ratio);
    warn!(
        "Average hit distance: {} (variance {})",
        summary.hit_distance_mean, summary.hit_distance_variance
    );
    warn!(
        "Average return time: {} (variance {})",
        summary.return_time_mean, summary.return_time_variance
    );
    info!("Metrics summary: {:#?}", summary);
    Ok(())
}

struct CliArguments {
    seed: u64,
    samples: usize,
    run_time: f64,
    arrival_mean: f64,
    p_central: f64,
    prob: f64,
    cache_size: usize,
    bandwidth: f64,
    signal_speed: f64,
    delay_variance: f64,
    hi_ttl: f64,
    mi_ttl: f64,
    depth_scaled_sizes: bool,
    prefill_caches: bool,
    scenario: Option<String>,
    output_data_files: Option<String>,
}

fn get_arguments() -> CliArguments {
    let matches = App::new("NDN simulator")
        .about("A monte-carlo simulation of a named-data networking overlay")
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .help("Seed of the random number generator")
                .default_value("42"),
        )
        .arg(
            Arg::with_name("samples")
                .long("samples")
                .help("The number of independent samples to run")
                .default_value("1"),
        )
        .arg(
            Arg::with_name("run_time")
                .long("run_time")
                .help("Simulated duration of one sample, in seconds")
                .default_value("1000"),
        )
        .arg(
            Arg::with_name("arrival_mean")
                .long("arrival_mean")
                .help("Mean of the exponential interest inter-arrival law, in seconds")
                .default_value("10.0"),
        )
        .arg(
            Arg::with_name("p_central")
                .long("p_central")
                .help("Probability that an interest targets the central producer")
                .default_value("0.3"),
        )
        .arg(
            Arg::with_name("prob")
                .long("prob")
                .help("Probability that a node caches a data packet passing through")
                .default_value("1.0"),
        )
        .arg(
            Arg::with_name("cache_size")
                .long("cache_size")
                .help("Capacity of each content store, in entries")
                .default_value("5"),
        )
        .arg(
            Arg::with_name("bandwidth")
                .long("bandwidth")
                .help("Channel bandwidth, in bits per second")
                .default_value("100000000"),
        )
        .arg(
            Arg::with_name("signal_speed")
                .long("signal_speed")
                .help("Signal propagation speed, in meters per second")
                .default_value("1500"),
        )
        .arg(
            Arg::with_name("delay_variance")
                .long("delay_variance")
                .help("Half-width of the uniform jitter on channel delays, in seconds")
                .default_value("0.005"),
        )
        .arg(
            Arg::with_name("hi_ttl")
                .long("hi_ttl")
                .help("Time-to-live of health_info data, in seconds")
                .default_value("60"),
        )
        .arg(
            Arg::with_name("mi_ttl")
                .long("mi_ttl")
                .help("Time-to-live of mission_info data, in seconds")
                .default_value("40"),
        )
        .arg(
            Arg::with_name("depth_scaled_sizes")
                .long("depth_scaled_sizes")
                .help("Size data packets by name depth instead of the jittered constant"),
        )
        .arg(
            Arg::with_name("prefill_caches")
                .long("prefill_caches")
                .help("Refill content stores with random data at sample boundaries"),
        )
        .arg(
            Arg::with_name("scenario")
                .long("scenario")
                .help("JSON scenario file; defaults to the built-in vehicle fleet")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("create_csv")
                .long("create_csv")
                .help("If given this argument, csv files will be generated with data on the simulation")
                .takes_value(true),
        )
        .get_matches();

    CliArguments {
        seed: matches.value_of("seed").unwrap().parse::<u64>().unwrap(),
        samples: matches
            .value_of("samples")
            .unwrap()
            .parse::<usize>()
            .unwrap(),
        run_time: matches
            .value_of("run_time")
            .unwrap()
            .parse::<f64>()
            .unwrap(),
        arrival_mean: matches
            .value_of("arrival_mean")
            .unwrap()
            .parse::<f64>()
            .unwrap(),
        p_central: matches
            .value_of("p_central")
            .unwrap()
            .parse::<f64>()
            .unwrap(),
        prob: matches.value_of("prob").unwrap().parse::<f64>().unwrap(),
        cache_size: matches
            .value_of("cache_size")
            .unwrap()
            .parse::<usize>()
            .unwrap(),
        bandwidth: matches
            .value_of("bandwidth")
            .unwrap()
            .parse::<f64>()
            .unwrap(),
        signal_speed: matches
            .value_of("signal_speed")
            .unwrap()
            .parse::<f64>()
            .unwrap(),
        delay_variance: matches
            .value_of("delay_variance")
            .unwrap()
            .parse::<f64>()
            .unwrap(),
        hi_ttl: matches.value_of("hi_ttl").unwrap().parse::<f64>().unwrap(),
        mi_ttl: matches.value_of("mi_ttl").unwrap().parse::<f64>().unwrap(),
        depth_scaled_sizes: matches.is_present("depth_scaled_sizes"),
        prefill_caches: matches.is_present("prefill_caches"),
        scenario: matches.value_of("scenario").map(|path| path.to_string()),
        output_data_files: matches.value_of("create_csv").map(|path| path.to_string()),
    }
}
