use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use tm_engine::resolution::feedback_for;
use tm_engine::{
    Game, GameConfig, JsonFileStore, LevelOutcome, Phase, ProgressStore, ResolutionResult, TileId,
};

pub fn run(seed: u64, levels: u32, board_size: u32, save: Option<&Path>) -> Result<(), String> {
    let config = GameConfig::default()
        .with_seed(seed)
        .with_total_levels(levels)
        .with_board_size(board_size);
    let store = save.map(JsonFileStore::new);

    let saved = match &store {
        Some(store) => store.load().unwrap_or_else(|e| {
            eprintln!("{}", format!("warning: ignoring save file: {e}").yellow());
            None
        }),
        None => None,
    };
    let game = match &saved {
        Some(data) => Game::resume(config, data),
        None => Game::new(config),
    }
    .map_err(|e| format!("failed to start game: {e}"))?;

    tracing::info!(seed, levels, resumed = saved.is_some(), "starting interactive game");
    let mut shell = Shell { game, store };

    println!("  {} Tile Master", "Starting".bold());
    println!("  Seed: {seed} | Levels: {levels}");
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    println!("{}\n", shell.level_banner());

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            println!("Goodbye!");
            break;
        }

        match shell.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
            }
            Err(e) => println!("{}\n", e.yellow()),
        }
    }

    Ok(())
}

/// Text command interpreter over a running game.
struct Shell {
    game: Game,
    store: Option<JsonFileStore>,
}

impl Shell {
    fn process(&mut self, input: &str) -> Result<String, String> {
        let mut words = input.split_whitespace();
        let cmd = words.next().unwrap_or("").to_lowercase();
        let args: Vec<&str> = words.collect();

        let (output, changed) = match cmd.as_str() {
            "roll" | "r" => (self.do_roll()?, true),
            "pick" | "p" => (self.do_pick(&args)?, true),
            "hint" => (self.do_hint()?, true),
            "dice" | "ad" => (self.do_dice(), true),
            "reset" => (self.do_reset()?, true),
            "next" => (self.do_next()?, true),
            "settings" => (self.do_settings(&args)?, true),
            "board" | "b" => (super::board_lines(self.game.session().board()).join("\n"), false),
            "targets" | "t" => (self.targets(), false),
            "status" | "s" => (self.status(), false),
            "journal" => (self.journal(), false),
            "export" => (self.export(&args)?, false),
            "help" | "?" => (HELP.to_string(), false),
            other => return Err(format!("unknown command '{other}' (type 'help')")),
        };

        if changed {
            self.save();
        }
        Ok(output)
    }

    fn save(&mut self) {
        if let Some(store) = &mut self.store
            && let Err(e) = store.save(&self.game.save_data())
        {
            tracing::debug!(path = %store.path().display(), error = %e, "save failed");
            eprintln!("{}", format!("warning: progress not saved: {e}").yellow());
        }
    }

    fn do_roll(&mut self) -> Result<String, String> {
        let roll = self.game.roll().map_err(|e| e.to_string())?;
        let mut out = format!(
            "Rolled a {} ({}). Pick {} tile{}. Dice left: {}",
            roll.value.to_string().bold(),
            roll.rule,
            roll.selectable,
            if roll.selectable == 1 { "" } else { "s" },
            roll.dice_left
        );
        if roll.special_moment {
            out.push_str(&format!(
                "\n{}",
                "Special moment! A bonus die was added.".magenta().bold()
            ));
        }
        out.push('\n');
        out.push_str(&super::board_lines(self.game.session().board()).join("\n"));
        Ok(out)
    }

    fn do_pick(&mut self, args: &[&str]) -> Result<String, String> {
        if args.is_empty() {
            return Err("usage: pick <id> [<id>...]".to_string());
        }
        let mut lines = Vec::new();
        for arg in args {
            let id = arg
                .parse::<u32>()
                .map(TileId)
                .map_err(|_| format!("not a tile id: {arg}"))?;
            let toggle = self.game.toggle_tile(id).map_err(|e| e.to_string())?;
            let verb = if toggle.selected { "Selected" } else { "Unselected" };
            lines.push(format!("{verb} tile {id} ({}/{})", toggle.count, toggle.max));

            if toggle.batch_ready() {
                let result = self.game.resolve_batch().map_err(|e| e.to_string())?;
                lines.push(self.describe_resolution(&result));
                break;
            }
        }
        Ok(lines.join("\n"))
    }

    fn describe_resolution(&self, result: &ResolutionResult) -> String {
        let mut out = format!(
            "+{} points. {}",
            result.points_gained,
            feedback_for(result.points_gained).green()
        );
        for name in &result.completed_categories {
            out.push_str(&format!("\n{} target complete!", name.bold()));
        }
        match result.outcome {
            LevelOutcome::Continue => {
                out.push_str(&format!(
                    "\nCompletion {}%. Dice left: {}",
                    result.completion_percent,
                    self.game.progress().dice
                ));
            }
            LevelOutcome::Complete => {
                let bonus = result.level_bonus.map_or(0, |b| b.total());
                out.push_str(&format!(
                    "\n{} +{bonus} bonus {}\nType 'next' to continue.",
                    "Level complete!".green().bold(),
                    super::stars(result.stars)
                ));
            }
            LevelOutcome::Failed => {
                out.push_str(&format!(
                    "\n{} {}% complete {}\nType 'dice' for more dice or 'reset' to try again.",
                    "Level failed.".red().bold(),
                    result.completion_percent,
                    super::stars(result.stars)
                ));
            }
        }
        out
    }

    fn do_hint(&mut self) -> Result<String, String> {
        let hint = self.game.use_hint().map_err(|e| e.to_string())?;
        let ids: Vec<String> = hint.tiles.iter().map(ToString::to_string).collect();
        Ok(format!(
            "Look for {} ({} more): tiles {}\nHints left: {}",
            hint.name.bold(),
            hint.remaining_needed,
            if ids.is_empty() {
                "none on the board".to_string()
            } else {
                ids.join(", ")
            },
            self.game.progress().hints
        ))
    }

    fn do_dice(&mut self) -> String {
        let added = self.game.watch_ad();
        format!(
            "+{added} dice. Dice left: {}",
            self.game.progress().dice
        )
    }

    fn do_reset(&mut self) -> Result<String, String> {
        self.game.reset_level().map_err(|e| e.to_string())?;
        Ok(self.level_banner())
    }

    fn do_next(&mut self) -> Result<String, String> {
        let advance = self.game.advance().map_err(|e| e.to_string())?;
        let mut out = String::new();
        if let Some(bonus) = advance.wrap_bonus {
            out.push_str(&format!(
                "{} +{bonus} points. Back to level 1.\n",
                "Campaign complete!".green().bold()
            ));
        }
        if advance.bonus_dice > 0 {
            out.push_str(&format!("{} bonus dice carried over.\n", advance.bonus_dice));
        }
        out.push_str(&self.level_banner());
        Ok(out)
    }

    fn do_settings(&mut self, args: &[&str]) -> Result<String, String> {
        let mut settings = self.game.settings();
        if let [key, value] = args {
            let on = match value.to_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                other => return Err(format!("expected on or off, got '{other}'")),
            };
            match key.to_lowercase().as_str() {
                "sound" => settings.sound = on,
                "music" => settings.music = on,
                "vibration" => settings.vibration = on,
                other => return Err(format!("unknown setting '{other}'")),
            }
            self.game.set_settings(settings);
        } else if !args.is_empty() {
            return Err("usage: settings [<sound|music|vibration> <on|off>]".to_string());
        }
        let flag = |on: bool| if on { "on" } else { "off" };
        Ok(format!(
            "Sound: {} | Music: {} | Vibration: {}",
            flag(settings.sound),
            flag(settings.music),
            flag(settings.vibration)
        ))
    }

    fn level_banner(&self) -> String {
        let session = self.game.session();
        format!(
            "{} (tier {}) | Dice: {}\n{}\n{}",
            format!("Level {}", session.level()).bold(),
            session.tier(),
            self.game.progress().dice,
            self.targets(),
            super::board_lines(session.board()).join("\n")
        )
    }

    fn targets(&self) -> String {
        self.game
            .session()
            .targets()
            .iter()
            .map(super::target_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn status(&self) -> String {
        let progress = self.game.progress();
        let mut out = format!(
            "Level {} | Score {} | Dice {} | Hints {} | Banked dice {}\nPhase: {} | Completion {}% {}",
            progress.level,
            progress.score,
            progress.dice,
            progress.hints,
            progress.bonus_dice,
            self.game.phase(),
            self.game.completion_percent(),
            super::stars(self.game.stars())
        );
        if matches!(self.game.phase(), Phase::Rolled | Phase::Resolving) {
            let selection = self.game.session().selection();
            let picked: Vec<String> = self.game.selected_tiles().map(|id| id.to_string()).collect();
            out.push_str(&format!(
                "\nSelected {}/{}: {}",
                selection.count(),
                selection.max(),
                picked.join(", ")
            ));
        }
        out
    }

    fn journal(&self) -> String {
        let recent = self.game.journal().recent(10);
        if recent.is_empty() {
            return "Journal is empty.".to_string();
        }
        recent
            .iter()
            .map(|e| format!("[{}] {}", e.timestamp().format("%H:%M:%S"), e.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn export(&self, args: &[&str]) -> Result<String, String> {
        match args.first().copied().unwrap_or("markdown") {
            "markdown" | "md" => Ok(self.game.journal().export_markdown()),
            "text" | "txt" => Ok(self.game.journal().export_text()),
            other => Err(format!("unsupported format '{other}' (markdown or text)")),
        }
    }
}

const HELP: &str = "\
Commands:
  roll                    Spend a die and roll
  pick <id> [<id>...]     Toggle tiles; the batch resolves when full
  hint                    Point at an unfinished target (costs a hint)
  dice                    Watch an ad for extra dice
  reset                   Restart the current level
  next                    Continue after completing a level
  board                   Show the board
  targets                 Show target progress
  status                  Show score, dice, hints and phase
  journal                 Show recent journal entries
  export [markdown|text]  Print the full journal
  settings [<key> <on|off>]  Show or change sound, music, vibration
  quit                    Leave the game";
