use std::cell::Cell;
use std::rc::Rc;

use clap::Args;
use studytimer_core::effects::SilentTone;
use studytimer_core::{
    Config, DurationInput, Event, Permission, Renderer, StudyTimer, TimerStatus, ToneEmitter,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::terminal::{
    BellTone, Output, SilentRenderer, TerminalNotifier, TerminalRenderer, TokioScheduler,
};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Hours field
    #[arg(long, default_value = "0")]
    pub hours: String,
    /// Minutes field
    #[arg(long, default_value = "0")]
    pub minutes: String,
    /// Seconds field
    #[arg(long, default_value = "0")]
    pub seconds: String,
    /// Pre-fill the fields from a preset (name or number)
    #[arg(long)]
    pub preset: Option<String>,
    /// Start counting down immediately
    #[arg(long)]
    pub start: bool,
    /// Print events as JSON lines instead of drawing the clock
    #[arg(long)]
    pub json: bool,
}

/// A line typed while the timer is running.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Start(Option<DurationInput>),
    Pause,
    Reset,
    Preset(String),
    Presets,
    Allow,
    Deny,
    Help,
    Quit,
}

const HELP: &str = "commands: start [h m s] | pause | reset | preset <name|n> | presets | allow | deny | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".into());
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "start" | "s" => match rest.as_slice() {
            [] => Command::Start(None),
            [h, m, s] => Command::Start(Some(DurationInput::parse(h, m, s))),
            _ => return Err("usage: start [hours minutes seconds]".into()),
        },
        "pause" | "p" => Command::Pause,
        "reset" | "r" => Command::Reset,
        "preset" => {
            if rest.is_empty() {
                return Err("usage: preset <name|number>".into());
            }
            Command::Preset(rest.join(" "))
        }
        "presets" => Command::Presets,
        "allow" => Command::Allow,
        "deny" => Command::Deny,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(command)
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(args))
}

struct Session {
    timer: StudyTimer<TokioScheduler>,
    config: Config,
    fields: DurationInput,
    permission: Rc<Cell<Permission>>,
    output: Output,
}

impl Session {
    fn emit(&self, events: &[Event]) -> Result<(), serde_json::Error> {
        if self.output == Output::Json {
            for event in events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        Ok(())
    }

    /// Print a message under the clock, then draw the clock again.
    fn say(&mut self, message: &str) {
        if self.output == Output::Pretty {
            println!("\n{message}");
            self.timer.refresh();
        }
    }

    /// Returns false when the session should end.
    fn handle(&mut self, command: Command) -> Result<bool, Box<dyn std::error::Error>> {
        let events = match command {
            Command::Start(input) => {
                if let Some(input) = input {
                    self.fields = input;
                }
                self.timer.start_from_input(self.fields)
            }
            Command::Pause => self.timer.pause().into_iter().collect(),
            Command::Reset => vec![self.timer.reset()],
            Command::Preset(key) => match self.config.find_preset(&key).cloned() {
                Some(preset) => {
                    self.fields = preset.input();
                    vec![self.timer.apply_preset(&preset)]
                }
                None => {
                    self.say(&format!("no preset named {key}"));
                    Vec::new()
                }
            },
            Command::Presets => {
                self.say(&super::presets::listing(&self.config));
                Vec::new()
            }
            Command::Allow => {
                self.resolve_permission(Permission::Granted);
                Vec::new()
            }
            Command::Deny => {
                self.resolve_permission(Permission::Denied);
                Vec::new()
            }
            Command::Help => {
                self.say(HELP);
                Vec::new()
            }
            Command::Quit => return Ok(false),
        };
        self.emit(&events)?;
        Ok(true)
    }

    fn resolve_permission(&mut self, answer: Permission) {
        self.permission.set(answer);
        self.timer.permission_resolved(answer);
        self.config.notifications.permission = answer;
        if let Err(e) = self.config.save() {
            tracing::warn!("could not remember notification choice: {e}");
        }
        info!(?answer, "notification permission answered");
    }
}

async fn run_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let output = if args.json { Output::Json } else { Output::Pretty };

    let (scheduler, mut fires) = TokioScheduler::new();
    let renderer: Box<dyn Renderer> = match output {
        Output::Pretty => Box::new(TerminalRenderer::new(&config.display)),
        Output::Json => Box::new(SilentRenderer),
    };
    let tone: Box<dyn ToneEmitter> = if config.sound.enabled {
        Box::new(BellTone)
    } else {
        Box::new(SilentTone)
    };
    let permission = Rc::new(Cell::new(config.notification_permission()));
    let notifier = TerminalNotifier::new(permission.clone(), output);

    let timer = StudyTimer::new(scheduler, renderer, tone, Box::new(notifier));
    let mut session = Session {
        timer,
        fields: DurationInput::parse(&args.hours, &args.minutes, &args.seconds),
        config,
        permission,
        output,
    };

    if let Some(key) = &args.preset {
        let preset = session
            .config
            .find_preset(key)
            .cloned()
            .ok_or_else(|| format!("no preset named {key}"))?;
        session.fields = preset.input();
        let event = session.timer.apply_preset(&preset);
        session.emit(&[event])?;
    }
    if args.start {
        let events = session.timer.start_from_input(session.fields);
        session.emit(&events)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            Some(handle) = fires.recv() => {
                if let Some(event) = session.timer.fire(handle) {
                    session.emit(&[event])?;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match parse_command(&line) {
                        Ok(command) => {
                            debug!(?command, "command received");
                            if !session.handle(command)? {
                                break;
                            }
                        }
                        Err(message) => session.say(&message),
                    },
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        if !stdin_open && session.timer.snapshot().status != TimerStatus::Running {
            break;
        }
    }

    if output == Output::Pretty {
        println!();
    }
    Ok(())
}
