use std::process;

mod api;
mod commands;
mod config;
mod constants;
mod context;
mod display;
mod error;
mod external;
mod git;
mod maintenance;
mod utils;

#[cfg(test)]
mod testing;

use crate::commands::dispatch::Dispatcher;
use crate::commands::registry::REGISTRY;
use crate::config::manager::{EnvSnapshot, FileConfig, Settings};
use crate::display::ui::Console;

fn main() {
    let env = EnvSnapshot::capture();

    // Load configuration
    let settings = match Settings::load(&env) {
        Ok(s) => s,
        Err(e) => {
            Console::terminal(!env.no_color)
                .warning(&format!("Failed to load config: {:#}", e));
            Settings::with_default_dirs(FileConfig::default(), &env)
        }
    };
    utils::debug::set_enabled(settings.verbose);

    let mut ctx = match context::AppContext::from_settings(settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            Console::terminal(!env.no_color)
                .error(&format!("Error initializing client: {:#}", e));
            process::exit(1);
        }
    };

    maintenance::maybe_run_maintenance(&ctx.settings, &mut ctx.console);

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let code = Dispatcher::new(&REGISTRY).dispatch(&mut ctx, &argv);
    process::exit(code);
}
