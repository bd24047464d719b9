//! Command-line front end

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader, Lines, Stdin};
use tokio::sync::{Mutex, watch};

use crate::command::intent::{
    parse_dimension, parse_laser_power, parse_length, parse_speed, parse_step_size,
};
use crate::command::{Axis, Intent, MachineState};
use crate::config::{Action, Config, LaserSwitch, LayoutFormat};
use crate::console::{ConsoleCommand, HELP, parse_console_line};
use crate::error::Error;
use crate::feedback;
use crate::job::{Job, Severity};
use crate::layout::{BedLayout, PathEvent, Point, path_program};
use crate::poller::PeriodicTask;
use crate::session::Controller;
use crate::transport::{Transport, open_serial};

type Writer = Box<dyn AsyncWrite + Unpin + Send>;
type StdinLines = Lines<BufReader<Stdin>>;
type PositionFeed = watch::Receiver<Option<feedback::Position>>;

/// Parse arguments, set up logging and run the requested action
pub async fn run() -> Result<()> {
    let (config, action) = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Some(path) = &config.profile_path {
        log::info!("Using profile {}", path.display());
    }

    match action {
        Action::Layout {
            bed,
            material,
            paths,
            no_draw,
            format,
        } => run_layout(
            &config,
            bed.as_deref(),
            material.as_deref(),
            &paths,
            !no_draw,
            format,
        ),
        action => run_machine(&config, action).await,
    }
}

fn run_layout(
    config: &Config,
    bed: Option<&str>,
    material: Option<&str>,
    paths: &[String],
    drawing: bool,
    format: LayoutFormat,
) -> Result<()> {
    let mut layout = BedLayout::new(config.bed());
    layout.set_drawing(drawing);

    if let Some(size) = bed {
        let (width, height) = parse_size("bed", size)?;
        layout.set_bed(width, height)?;
    }
    if let Some(size) = material {
        let (width, height) = parse_size("material", size)?;
        layout.place_material(width, height)?;
    }
    for path in paths {
        for text in path.split_whitespace() {
            let point = Point::parse(text).ok_or_else(|| Error::InvalidNumeric {
                what: "point",
                input: text.to_string(),
            })?;
            if layout.add_point(point) == PathEvent::Ignored {
                log::warn!("Drawing is disabled, ignoring point {text}");
            }
        }
        layout.break_path();
    }

    if !layout.validate() {
        log::warn!("Material no longer fits the bed");
    }

    match format {
        LayoutFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&layout.scene())?);
        }
        LayoutFormat::Gcode => {
            let program = path_program(
                layout.bed(),
                layout.path(),
                config.profile.speed,
                config.profile.laser_power,
            );
            for line in program {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// "WIDTHxHEIGHT"
fn parse_size(what: &'static str, text: &str) -> Result<(i64, i64)> {
    let (width, height) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| Error::InvalidNumeric {
            what,
            input: text.to_string(),
        })?;
    Ok((parse_dimension(what, width)?, parse_dimension(what, height)?))
}

async fn run_machine(config: &Config, action: Action) -> Result<()> {
    let (writer, positions) = open_link(config)?;
    let controller = Controller::new(
        config.initial_state(),
        config.translator(),
        Transport::new(writer),
    );
    let mut controller = match positions {
        Some(rx) => controller.with_positions(rx),
        None => controller,
    };

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    match action {
        Action::Jog {
            direction,
            step,
            speed,
        } => {
            let intent = Intent::Jog {
                direction: direction.parse()?,
                step: step.as_deref().map(parse_step_size).transpose()?,
                speed: speed.as_deref().map(parse_speed).transpose()?,
            };
            controller.dispatch(intent).await?;
        }
        Action::Home => {
            controller.dispatch(Intent::Home).await?;
        }
        Action::Abort => {
            controller.dispatch(Intent::Abort).await?;
        }
        Action::Laser { switch } => {
            let intent = match switch {
                LaserSwitch::On => Intent::LaserOn,
                LaserSwitch::Off => Intent::LaserOff,
            };
            controller.dispatch(intent).await?;
        }
        Action::Power { value } => {
            let power = parse_laser_power(&value)?;
            controller.dispatch(Intent::SetLaserPower(power)).await?;
            log::info!("Laser power set to {power}.");
        }
        Action::Cut { axis, length, yes } => {
            let axis: Axis = axis.parse()?;
            let length = parse_length(&length)?;
            let confirmed = yes || confirm_cut(controller.state(), &mut stdin, axis, length).await?;
            cut(&mut controller, axis, length, confirmed).await?;
        }
        Action::Send { line } => {
            controller.dispatch(Intent::SendRaw(line.join(" "))).await?;
        }
        Action::Stream { file, yes } => {
            stream_file(&mut controller, &mut stdin, &file, yes).await?;
        }
        Action::Console => {
            run_console(controller, stdin, config).await?;
        }
        Action::Layout { .. } => unreachable!("layout runs without a machine link"),
    }

    Ok(())
}

/// Writer for payloads plus, for a real port, the position feed
fn open_link(config: &Config) -> Result<(Writer, Option<PositionFeed>)> {
    if config.dry_run {
        log::info!("Dry run: payloads go to stdout");
        return Ok((Box::new(tokio::io::stdout()), None));
    }

    let settings = config.serial_settings();
    let port = open_serial(&settings)
        .with_context(|| format!("Failed to set up serial connection on {}", settings.port))?;
    let (reader, writer) = tokio::io::split(port);

    let (tx, rx) = watch::channel(None);
    tokio::spawn(feedback::read_reports(reader, tx));

    Ok((Box::new(writer), Some(rx)))
}

async fn ask<R: AsyncBufRead + Unpin>(stdin: &mut Lines<R>, prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N] ");
    let answer = stdin.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn confirm_cut<R: AsyncBufRead + Unpin>(
    state: &MachineState,
    stdin: &mut Lines<R>,
    axis: Axis,
    length: f64,
) -> Result<bool> {
    let prompt = format!(
        "Execute a {length}mm cut along the {axis}-axis at speed {} and laser power {}?",
        state.speed, state.laser_power
    );
    ask(stdin, &prompt).await
}

/// Confirm a console cut without holding the controller lock during the prompt
async fn confirm_console_cut<W, R>(
    controller: &Mutex<Controller<W>>,
    stdin: &mut Lines<R>,
    axis: Axis,
    length: f64,
) -> Result<bool>
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    let state = controller.lock().await.state().clone();
    confirm_cut(&state, stdin, axis, length).await
}

async fn cut<W: AsyncWrite + Unpin>(
    controller: &mut Controller<W>,
    axis: Axis,
    length: f64,
    confirmed: bool,
) -> Result<()> {
    let sent = controller
        .dispatch(Intent::PredefinedCut {
            axis,
            length,
            confirmed,
        })
        .await?;
    if sent.is_empty() {
        eprintln!("Cut cancelled.");
    }
    Ok(())
}

async fn stream_file<W: AsyncWrite + Unpin>(
    controller: &mut Controller<W>,
    stdin: &mut StdinLines,
    file: &std::path::Path,
    yes: bool,
) -> Result<()> {
    let job = Job::load(file)
        .await
        .with_context(|| format!("Error opening G-code file {}", file.display()))?;

    eprintln!("{}: {}", file.display(), job.summary());
    for diagnostic in job.preflight().diagnostics {
        let level = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!("  line {}: {level}: {}", diagnostic.line, diagnostic.message);
    }

    if job.is_empty() {
        log::warn!("{} has nothing to send", file.display());
        return Ok(());
    }
    if !yes && !ask(stdin, "Send this G-code to the machine?").await? {
        eprintln!("Nothing sent.");
        return Ok(());
    }

    let sent = controller
        .stream_job(&job)
        .await
        .with_context(|| format!("Error sending G-code file {}", file.display()))?;
    log::info!("Sent {} payloads from {}", sent, file.display());
    Ok(())
}

async fn run_console<W>(
    controller: Controller<W>,
    mut stdin: StdinLines,
    config: &Config,
) -> Result<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let controller = Arc::new(Mutex::new(controller));

    let refresh = {
        let controller = controller.clone();
        PeriodicTask::start(config.refresh_period(), move || {
            let controller = controller.clone();
            async move {
                let mut controller = controller.lock().await;
                if controller.refresh_position() {
                    log::info!("{}", controller.status_line());
                }
            }
        })
    };

    eprintln!("{}", controller.lock().await.status_line());
    eprintln!("Type 'help' for commands.");

    while let Some(line) = stdin.next_line().await? {
        let command = match parse_console_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        };

        let confirmed = match &command {
            ConsoleCommand::Cut { axis, length } => {
                confirm_console_cut(&controller, &mut stdin, *axis, *length).await?
            }
            _ => false,
        };

        let mut guard = controller.lock().await;
        let outcome = match command {
            ConsoleCommand::Intent(intent) => guard.dispatch(intent).await.map(|_| ()),
            ConsoleCommand::Cut { axis, length } => {
                guard
                    .dispatch(Intent::PredefinedCut {
                        axis,
                        length,
                        confirmed,
                    })
                    .await
                    .map(|_| ())
            }
            ConsoleCommand::Resume => {
                guard.resume();
                Ok(())
            }
            ConsoleCommand::Status => {
                eprintln!("{}", guard.status_line());
                Ok(())
            }
            ConsoleCommand::Help => {
                eprintln!("{HELP}");
                Ok(())
            }
            ConsoleCommand::Quit => break,
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_validation() || matches!(e, Error::Halted) => eprintln!("Error: {e}"),
            Err(e) => {
                refresh.stop().await;
                return Err(e).context("Failed to send command");
            }
        }
    }

    refresh.stop().await;
    Ok(())
}
