use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use bno055ctl::linux::{self, Delay, I2cdev};
use bno055ctl::report::Report;
use bno055ctl::{
    parse_address, store, ArgumentError, Bno055, DataType, OperationMode, PowerMode,
    SessionConfig, StoredCalibration, DEFAULT_BUS,
};

/// What `-t` asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Query {
    Data(DataType),
    Info,
    Calibration,
    Continuous,
}

impl FromStr for Query {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inf" => Ok(Query::Info),
            "cal" => Ok(Query::Calibration),
            "con" => Ok(Query::Continuous),
            _ => s.parse().map(Query::Data),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bno055ctl", version, about = "Read and configure a BNO055 over i2c-dev")]
struct Args {
    /// Sensor address, 0x28 or 0x29
    #[arg(short, long, default_value = "0x28", value_parser = parse_address)]
    address: u8,

    /// I2C bus device
    #[arg(short, long, default_value = DEFAULT_BUS)]
    bus: String,

    /// Dump the register map
    #[arg(short, long)]
    dump: bool,

    /// Operation mode: config acconly magonly gyronly accmag accgyro maggyro amg imu compass m4g ndof ndof_fmc
    #[arg(short, long)]
    mode: Option<OperationMode>,

    /// Power mode: normal low suspend
    #[arg(short, long)]
    power: Option<PowerMode>,

    /// Soft reset the sensor
    #[arg(short, long)]
    reset: bool,

    /// Data to read: acc gyr mag eul qua gra lin inf cal con
    #[arg(short = 't', long = "type")]
    query: Option<Query>,

    /// Load calibration from file
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Write calibration to file
    #[arg(short, long)]
    write: Option<PathBuf>,

    /// Also write the report as an HTML table
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write the bare 22-byte calibration form
    #[arg(long)]
    legacy: bool,

    /// Apply a calibration file recorded on a different chip or firmware
    #[arg(long)]
    force: bool,

    /// Polling interval for `-t con`, in milliseconds
    #[arg(long, default_value_t = 100)]
    interval: u64,

    /// Number of `-t con` samples, unlimited if absent
    #[arg(long)]
    count: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let config = SessionConfig::new(&args.bus).with_address(args.address)?;

    // A bad calibration file must fail before anything reaches the bus.
    let stored = match &args.load {
        Some(path) => Some(
            store::load(path).with_context(|| format!("cannot load {}", path.display()))?,
        ),
        None => None,
    };

    let mut imu = linux::open(&config)?;
    let mut delay = Delay;

    imu.init()
        .with_context(|| format!("no BNO055 at {:#04x} on {}", config.address, config.bus))?;

    if args.reset {
        imu.soft_reset(&mut delay).context("soft reset failed")?;
        info!("sensor reset");
    }

    if args.mode.is_some() || args.power.is_some() {
        imu.configure(args.mode, args.power, &mut delay)
            .context("cannot change operation or power mode")?;
        if let Some(power) = args.power {
            info!("power mode {}", power);
        }
        if let Some(mode) = args.mode {
            info!("operation mode {}", mode);
        }
    }

    if let (Some(stored), Some(path)) = (&stored, &args.load) {
        apply_calibration(&mut imu, &mut delay, stored, path, args.force)?;
    }

    if args.dump {
        dump(&mut imu)?;
    }

    let report = match args.query {
        Some(Query::Data(kind)) => Some(Report::sample(&imu.read(kind)?)),
        Some(Query::Info) => Some(Report::info(&imu.info()?)),
        Some(Query::Calibration) => {
            let status = imu.calibration_status()?;
            let offsets = imu.calibration_offsets(&mut delay)?;
            Some(Report::calibration(&status, Some(&offsets)))
        }
        Some(Query::Continuous) => {
            poll(&mut imu, Duration::from_millis(args.interval), args.count)?;
            None
        }
        None => None,
    };

    if let Some(path) = &args.write {
        write_calibration(&mut imu, &mut delay, path, args.legacy)?;
    }

    if let Some(report) = report {
        print!("{}", report.render_text());
        if let Some(path) = &args.output {
            fs::write(path, report.render_html())
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!("report written to {}", path.display());
        }
    } else if args.output.is_some() {
        warn!("-o given without a report type, nothing written");
    }

    Ok(())
}

fn apply_calibration(
    imu: &mut Bno055<I2cdev>,
    delay: &mut Delay,
    stored: &StoredCalibration,
    path: &Path,
    force: bool,
) -> Result<()> {
    let live = imu.identity()?;
    if let Err(e) = stored.check_identity(live) {
        if !force {
            bail!("{}: {} (use --force to apply anyway)", path.display(), e);
        }
        warn!("{}: {}, applying anyway", path.display(), e);
    }

    imu.set_calibration_profile(&stored.profile, delay)?;
    info!("calibration loaded from {}", path.display());

    Ok(())
}

fn write_calibration(
    imu: &mut Bno055<I2cdev>,
    delay: &mut Delay,
    path: &Path,
    legacy: bool,
) -> Result<()> {
    let profile = imu.calibration_profile(delay)?;
    let identity = if legacy { None } else { Some(imu.identity()?) };

    store::save(path, &profile, identity)
        .with_context(|| format!("cannot write {}", path.display()))?;
    info!("calibration written to {}", path.display());

    Ok(())
}

fn dump(imu: &mut Bno055<I2cdev>) -> Result<()> {
    let regs = imu.dump_registers()?;
    for (row, chunk) in regs.chunks(16).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{:#04x}: {}", row * 16, bytes.join(" "));
    }

    Ok(())
}

/// Fixed-interval Euler angle output.
fn poll(imu: &mut Bno055<I2cdev>, interval: Duration, count: Option<u64>) -> Result<()> {
    let mut n = 0;
    while count.map_or(true, |count| n < count) {
        let euler = imu.read(DataType::Euler)?;
        let line: Vec<String> = euler
            .labelled()
            .map(|(label, value)| format!("{} {:>8.2}", label, value))
            .collect();
        println!("{} {}", line.join("  "), euler.unit);

        n += 1;
        thread::sleep(interval);
    }

    Ok(())
}
