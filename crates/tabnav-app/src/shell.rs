//! Line commands for the interactive driver.

use anyhow::{Result, bail};

use tabnav_core::{
    CommandReply, FileLoadOptions, LoadOptions, LoadPromise, NavCommand, NavigationController,
    SimulatedSurface,
};

const HELP: &str = "\
open <url>      load a URL
file <p>[#f]    load a local file (relative to app_root)
back | forward | go <offset> | length
index <i>       jump to history entry i
reload | hard-reload | stop
remove <i>      drop history entry i
clear           forget all history
list            show history
stall <prefix>  make matching loads hang
quit";

/// What the caller should do after a command.
pub enum Outcome {
    Lines(Vec<String>),
    Quit,
}

/// A controller plus the loads still waiting to settle.
pub struct Shell {
    nav: NavigationController<SimulatedSurface>,
    loads: Vec<(String, LoadPromise)>,
}

impl Shell {
    pub fn new(nav: NavigationController<SimulatedSurface>) -> Self {
        Self {
            nav,
            loads: Vec::new(),
        }
    }

    /// Start a load and remember its promise under `label`.
    pub fn track<F>(&mut self, label: &str, start: F) -> Result<()>
    where
        F: FnOnce(
            &mut NavigationController<SimulatedSurface>,
        ) -> tabnav_types::Result<LoadPromise>,
    {
        let promise = start(&mut self.nav)?;
        self.loads.push((label.to_string(), promise));
        Ok(())
    }

    /// Deliver queued surface events and report loads that settled.
    pub fn settle(&mut self) -> Vec<String> {
        self.nav.pump();
        let mut messages = Vec::new();
        self.loads.retain_mut(|(label, promise)| match promise.try_settle() {
            None => true,
            Some(Ok(())) => {
                messages.push(format!("loaded {label}"));
                false
            },
            Some(Err(e)) if e.is_aborted() => {
                messages.push(format!("superseded {label}: {e}"));
                false
            },
            Some(Err(e)) => {
                messages.push(format!("failed {label}: {e}"));
                false
            },
        });
        messages
    }

    pub fn run(&mut self, line: &str) -> Result<Outcome> {
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };
        let lines = match cmd {
            "" => Vec::new(),
            "quit" | "exit" => return Ok(Outcome::Quit),
            "help" => HELP.lines().map(str::to_string).collect(),
            "back" | "forward" | "go" | "length" => {
                let command: NavCommand = line.parse()?;
                match self.nav.execute(command) {
                    CommandReply::Length(n) => vec![n.to_string()],
                    CommandReply::Ack => Vec::new(),
                }
            },
            "open" => {
                let url = required(arg, "open <url>")?;
                self.track(url, |nav| Ok(nav.load_url(url, LoadOptions::default())))?;
                Vec::new()
            },
            "file" => {
                let spec = required(arg, "file <path>[#frag]")?;
                let (path, hash) = match spec.split_once('#') {
                    Some((path, hash)) => (path, Some(hash.to_string())),
                    None => (spec, None),
                };
                let options = FileLoadOptions {
                    hash,
                    ..FileLoadOptions::default()
                };
                self.track(spec, |nav| nav.load_file(path, &options))?;
                Vec::new()
            },
            "index" => {
                self.nav.go_to_index(required(arg, "index <i>")?.parse()?);
                Vec::new()
            },
            "reload" => {
                self.nav.reload();
                Vec::new()
            },
            "hard-reload" => {
                self.nav.reload_ignoring_cache();
                Vec::new()
            },
            "stop" => {
                self.nav.stop();
                Vec::new()
            },
            "remove" => {
                let index: isize = required(arg, "remove <i>")?.parse()?;
                if self.nav.remove_entry_at_index(index) {
                    vec![format!("removed entry {index}")]
                } else {
                    vec![format!("entry {index} cannot be removed")]
                }
            },
            "clear" => {
                self.nav.clear_history();
                Vec::new()
            },
            "list" => self.listing(),
            "stall" => {
                self.nav
                    .surface_mut()
                    .stall(required(arg, "stall <prefix>")?);
                Vec::new()
            },
            other => bail!("unknown command: {other} (try `help`)"),
        };
        Ok(Outcome::Lines(lines))
    }

    fn listing(&self) -> Vec<String> {
        let history = self.nav.history();
        history
            .entries()
            .iter()
            .enumerate()
            .map(|(i, url)| {
                let marker = if Some(i) == history.current_index() {
                    '*'
                } else if Some(i) == history.pending_index() {
                    '~'
                } else {
                    ' '
                };
                format!("{marker} {i:>3}  {url}")
            })
            .collect()
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(arg)
}
