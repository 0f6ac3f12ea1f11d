use chrono::NaiveDate;
use questlog::analytics::HeatmapCell;
use questlog::boss::BossId;
use questlog::build_info;
use questlog::core::constants::DEFAULT_HEATMAP_WEEKS;
use questlog::progression::{level_info, rank_title, Track};
use questlog::session::AutoConfirm;
use questlog::shop::ShopItem;
use questlog::skip::SkipMode;
use questlog::tasks::{NewTask, TaskEdit, TaskId};
use questlog::{
    ActionResult, Confirm, EngineConfig, EngineEvent, GameSession, Outcome, SessionPrompt,
};
use std::io::{self, BufRead, Write};

type Session = GameSession;

fn print_help() {
    println!("questlog - gamified task tracker\n");
    println!("Usage: questlog [--yes] <command> [args]\n");
    println!("Commands:");
    println!("  start                          Record today's visit and show prompts");
    println!("  status                         Levels, gold, boss and today's tasks");
    println!("  week <goal> [goal...]          Set this week's goals and mission pool");
    println!("  add <title> [--track T] [--reward N] [--date YYYY-MM-DD] [--rest]");
    println!("  tasks [YYYY-MM-DD]             List tasks for a day (default today)");
    println!("  done <id>                      Complete a task");
    println!("  undo <id>                      Return a completed task to pending");
    println!("  edit <id> [--title S] [--track T] [--reward N] [--date D]");
    println!("  delete <id>                    Delete a task");
    println!("  gacha                          Draw today's mission");
    println!("  collect                        Bank idle gold");
    println!("  boss                           Show the active boss");
    println!("  boss new <name> <YYYY-MM-DD>   Start a long-term goal");
    println!("  boss abandon <id>              Delete a boss");
    println!("  shop                           Show prices");
    println!("  buy <potion|ticket>            Buy an item");
    println!("  skip <ticket|penalty>          Skip all of today's pending tasks");
    println!("  profile <hobbies> <recent>     Context for mission generation");
    println!("  correct <track> <level> <exp>  Overwrite a track's EXP");
    println!("  heatmap [weeks]                Activity over recent weeks");
    println!("  --version                      Show version information");
    println!("  --help                         Show this help message");
    println!("\nEnvironment: QUESTLOG_DATA_DIR, QUESTLOG_CONTENT_URL, QUESTLOG_CONTENT_KEY, RUST_LOG");
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let assume_yes = args.first().map(|a| a == "--yes" || a == "-y").unwrap_or(false);
    if assume_yes {
        args.remove(0);
    }

    match args.first().map(String::as_str) {
        Some("--version") | Some("-v") => {
            println!("{}", build_info::version_line());
            return Ok(());
        }
        Some("--help") | Some("-h") | None => {
            print_help();
            return Ok(());
        }
        _ => {}
    }

    let config = EngineConfig::from_env();
    let mut session = GameSession::open(&config)?;

    let mut confirm: Box<dyn Confirm> = if assume_yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(ask_stdin)
    };

    let outcome = run(&mut session, &args, confirm.as_mut());

    let mut failed_writes = 0;
    for written in session.flush() {
        if let Err(e) = &written.result {
            eprintln!("Warning: could not save {}: {}", written.command, e);
            failed_writes += 1;
        }
    }

    if let Err(message) = outcome {
        eprintln!("{}", message);
        std::process::exit(1);
    }
    if failed_writes > 0 {
        std::process::exit(2);
    }
    Ok(())
}

fn ask_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn run(session: &mut Session, args: &[String], confirm: &mut dyn Confirm) -> Result<(), String> {
    let command = args[0].as_str();
    let rest = &args[1..];

    match command {
        "start" => {
            match session.start_day() {
                SessionPrompt::WeeklySetup { week_id } => {
                    println!("New week {}! Set your goals with: questlog week <goal> ...", week_id)
                }
                SessionPrompt::DailyGacha => {
                    println!("Today's mission draw is ready: questlog gacha")
                }
                SessionPrompt::None => println!("Welcome back."),
            }
            let info = session.state().meta.streak.info();
            println!(
                "Streak: {} day(s), {} day(s) to the next big bonus",
                info.current_streak, info.days_to_next_big_bonus
            );
            Ok(())
        }
        "status" => {
            print_status(session);
            Ok(())
        }
        "week" => {
            let result = session
                .setup_week(&rest.join("\n"))
                .map_err(|e| e.to_string())?;
            report(&result);
            for mission in &session.state().pool.missions {
                let tag = if mission.is_sabori { " (rest)" } else { "" };
                println!("  [{}] {}{} +{}", mission.track, mission.title, tag, mission.reward);
            }
            Ok(())
        }
        "add" => cmd_add(session, rest),
        "tasks" => {
            let date = match rest.first() {
                Some(raw) => parse_date(raw)?,
                None => session.today(),
            };
            print_tasks(session, date);
            Ok(())
        }
        "done" => {
            let id = resolve_task(session, rest)?;
            let result = session.complete_task(id).map_err(|e| e.to_string())?;
            report(&result);
            Ok(())
        }
        "undo" => {
            let id = resolve_task(session, rest)?;
            let result = session.undo_task(id).map_err(|e| e.to_string())?;
            report(&result);
            Ok(())
        }
        "edit" => {
            let id = resolve_task(session, rest)?;
            let edit = parse_edit(&rest[1..])?;
            let result = session.edit_task(id, edit).map_err(|e| e.to_string())?;
            report(&result);
            println!("Task updated.");
            Ok(())
        }
        "delete" => {
            let id = resolve_task(session, rest)?;
            let outcome = session.delete_task(id, confirm).map_err(|e| e.to_string())?;
            report_outcome(&outcome);
            Ok(())
        }
        "gacha" => {
            let mission = session.roll_gacha().map_err(|e| e.to_string())?;
            println!(
                "You drew: [{}] {} (+{}){}",
                mission.track,
                mission.title,
                mission.reward,
                if mission.is_sabori { " - a rest mission" } else { "" }
            );
            if confirm.confirm("Accept this mission?") {
                let (_, result) = session.accept_gacha(mission.id).map_err(|e| e.to_string())?;
                report(&result);
                println!("Mission added to today's tasks.");
            } else {
                println!("Draw discarded. You can roll again today.");
            }
            Ok(())
        }
        "collect" => {
            let result = session.collect_idle_gold();
            if result.events.is_empty() {
                println!("Nothing to collect yet.");
            }
            report(&result);
            Ok(())
        }
        "boss" => cmd_boss(session, rest, confirm),
        "shop" => {
            report(&session.open_shop());
            let view = session.shop_view();
            println!("Gold: {}", view.gold);
            for item in ShopItem::ALL {
                let price = match item {
                    ShopItem::Potion => view.potion_price,
                    ShopItem::SkipTicket => view.ticket_price,
                };
                println!("  {:<14} {:>6}g  {}", item.name(), price, item.description());
            }
            println!("Tickets owned: {}", view.tickets);
            Ok(())
        }
        "buy" => {
            let item: ShopItem = rest
                .first()
                .ok_or("Usage: questlog buy <potion|ticket>")?
                .parse()?;
            let result = session.buy(item).map_err(|e| e.to_string())?;
            report(&result);
            Ok(())
        }
        "skip" => {
            let mode = match rest.first().map(String::as_str) {
                Some("ticket") => SkipMode::Ticket,
                Some("penalty") => SkipMode::Penalty,
                _ => return Err("Usage: questlog skip <ticket|penalty>".to_string()),
            };
            let outcome = session
                .emergency_skip(mode, confirm)
                .map_err(|e| e.to_string())?;
            if outcome.events().is_empty() && !outcome.is_cancelled() {
                println!("No pending tasks today.");
            }
            report_outcome(&outcome);
            Ok(())
        }
        "profile" => {
            let hobbies = rest.first().map(String::as_str).unwrap_or("");
            let recent = rest.get(1).map(String::as_str).unwrap_or("");
            session.update_profile(hobbies, recent);
            println!("Profile saved.");
            Ok(())
        }
        "correct" => {
            if rest.len() < 3 {
                return Err("Usage: questlog correct <track> <level> <exp>".to_string());
            }
            let track: Track = rest[0].parse()?;
            let level: u32 = rest[1].parse().map_err(|_| "level must be a number")?;
            let exp: u64 = rest[2].parse().map_err(|_| "exp must be a number")?;
            let total = session
                .correct_stat(track, level, exp)
                .map_err(|e| e.to_string())?;
            println!("{} set to {} EXP (level {}).", track.label(), total, level_info(total).level);
            Ok(())
        }
        "heatmap" => {
            let weeks = match rest.first() {
                Some(raw) => raw.parse().map_err(|_| "weeks must be a number")?,
                None => DEFAULT_HEATMAP_WEEKS,
            };
            print_heatmap(&session.heatmap(weeks));
            Ok(())
        }
        other => Err(format!(
            "Unknown command: {}\nRun 'questlog --help' for usage.",
            other
        )),
    }
}

fn cmd_add(session: &mut Session, rest: &[String]) -> Result<(), String> {
    let mut title_words = Vec::new();
    let mut track: Option<Track> = None;
    let mut reward: Option<u64> = None;
    let mut date = session.today();
    let mut rest_task = false;

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--track" => track = Some(next_value(&mut iter, "--track")?.parse()?),
            "--reward" => {
                reward = Some(
                    next_value(&mut iter, "--reward")?
                        .parse()
                        .map_err(|_| "reward must be a number")?,
                )
            }
            "--date" => date = parse_date(next_value(&mut iter, "--date")?)?,
            "--rest" => rest_task = true,
            word => title_words.push(word.to_string()),
        }
    }
    let title = title_words.join(" ");

    let (id, result) = match (track, reward) {
        (None, None) if !rest_task => session.add_task_assisted(&title, date),
        _ => {
            let mut new = NewTask::new(
                title,
                track.unwrap_or(Track::Work),
                date,
                reward.unwrap_or(0),
            );
            if rest_task {
                new = new.rest();
            }
            session.add_task(new)
        }
    }
    .map_err(|e| e.to_string())?;

    report(&result);
    if let Some(task) = session.state().tasks.iter().find(|t| t.id == id) {
        println!(
            "Added {} [{}] {} +{} on {}",
            short_id(&task.id),
            task.track,
            task.title,
            task.reward,
            task.date
        );
    }
    Ok(())
}

fn cmd_boss(session: &mut Session, rest: &[String], confirm: &mut dyn Confirm) -> Result<(), String> {
    match rest.first().map(String::as_str) {
        None => {
            match session.state().active_boss() {
                Some(boss) => {
                    println!("{} the {} ({})", boss.name, boss.archetype, short_id(&boss.id));
                    if !boss.description.is_empty() {
                        println!("  {}", boss.description);
                    }
                    println!(
                        "  HP {}/{}  reward {}g + {} EXP",
                        boss.hp, boss.max_hp, boss.reward_gold, boss.exp_reward
                    );
                    if let Some(deadline) = boss.deadline {
                        println!("  Deadline {}", deadline);
                    }
                }
                None => println!("No active boss. Start one with: questlog boss new <name> <date>"),
            }
            let defeated = session.state().defeated_bosses().count();
            if defeated > 0 {
                println!("Bosses defeated: {}", defeated);
            }
            Ok(())
        }
        Some("new") => {
            if rest.len() < 3 {
                return Err("Usage: questlog boss new <name> <YYYY-MM-DD>".to_string());
            }
            let deadline = parse_date(&rest[rest.len() - 1])?;
            let name = rest[1..rest.len() - 1].join(" ");
            let id = session
                .create_boss(&name, deadline)
                .map_err(|e| e.to_string())?;
            if let Some(boss) = session.state().bosses.iter().find(|b| b.id == id) {
                println!("A {} appears: {} with {} HP!", boss.archetype, boss.name, boss.hp);
            }
            Ok(())
        }
        Some("abandon") => {
            let prefix = rest.get(1).ok_or("Usage: questlog boss abandon <id>")?;
            let id = resolve_boss(session, prefix)?;
            let outcome = session
                .abandon_boss(id, confirm)
                .map_err(|e| e.to_string())?;
            if outcome.is_cancelled() {
                println!("Cancelled.");
            } else {
                println!("Boss abandoned.");
            }
            Ok(())
        }
        Some(other) => Err(format!("Unknown boss command: {}", other)),
    }
}

fn next_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("invalid date '{}'", raw))
}

fn parse_edit(args: &[String]) -> Result<TaskEdit, String> {
    let mut edit = TaskEdit::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--title" => edit.title = Some(next_value(&mut iter, "--title")?.to_string()),
            "--track" => edit.track = Some(next_value(&mut iter, "--track")?.parse()?),
            "--reward" => {
                edit.reward = Some(
                    next_value(&mut iter, "--reward")?
                        .parse()
                        .map_err(|_| "reward must be a number")?,
                )
            }
            "--date" => edit.date = Some(parse_date(next_value(&mut iter, "--date")?)?),
            other => return Err(format!("unknown edit option '{}'", other)),
        }
    }
    Ok(edit)
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

fn resolve_task(session: &Session, rest: &[String]) -> Result<TaskId, String> {
    let prefix = rest.first().ok_or("A task id is required")?;
    let matches: Vec<TaskId> = session
        .state()
        .tasks
        .iter()
        .filter(|t| t.id.to_string().starts_with(prefix.as_str()))
        .map(|t| t.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No task matches '{}'", prefix)),
        _ => Err(format!("'{}' matches several tasks; use more characters", prefix)),
    }
}

fn resolve_boss(session: &Session, prefix: &str) -> Result<BossId, String> {
    session
        .state()
        .bosses
        .iter()
        .find(|b| b.id.to_string().starts_with(prefix))
        .map(|b| b.id)
        .ok_or_else(|| format!("No boss matches '{}'", prefix))
}

fn print_status(session: &Session) {
    let state = session.state();
    for track in Track::ALL {
        let info = level_info(state.stats.get(track));
        println!(
            "{:<9} Lv.{:<3} {:<22} {:>5}/{:<5} EXP",
            track.label(),
            info.level,
            rank_title(track, info.level),
            info.current_level_exp,
            info.next_level_req
        );
    }
    let idle = session.idle_report();
    println!(
        "Gold: {} (+{} waiting, {}/h)",
        state.gold, idle.pending, idle.rate_per_hour
    );
    if let Some(boss) = state.active_boss() {
        println!("Boss: {} {}/{} HP", boss.name, boss.hp, boss.max_hp);
    }
    println!("Missions left this week: {}", state.pool.unused_count());
    print_tasks(session, session.today());
}

fn print_tasks(session: &Session, date: NaiveDate) {
    let tasks: Vec<_> = session.state().tasks_on(date).collect();
    if tasks.is_empty() {
        println!("No tasks on {}.", date);
        return;
    }
    println!("Tasks on {}:", date);
    for task in tasks {
        let amount = if task.is_done() {
            format!("{:+}", task.display_delta())
        } else {
            format!("+{}", task.reward)
        };
        println!(
            "  {} [{:<8}] {:<9} {} {}",
            short_id(&task.id),
            task.status.label(),
            task.track.name(),
            task.title,
            amount
        );
    }
}

fn print_heatmap(cells: &[HeatmapCell]) {
    for week in cells.chunks(7) {
        let row: String = week
            .iter()
            .map(|c| match c.count {
                0 => '.',
                1 => '-',
                2..=3 => '+',
                _ => '#',
            })
            .collect();
        if let Some(first) = week.first() {
            println!("{} {}", first.date, row);
        }
    }
}

fn report_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Cancelled => println!("Cancelled."),
        Outcome::Applied(result) => report(result),
    }
}

fn report(result: &ActionResult) {
    for event in &result.events {
        match event {
            EngineEvent::LevelUp { track, level } => {
                println!("LEVEL UP! {} reached level {}", track.label(), level)
            }
            EngineEvent::ExpGained { track, amount } => println!("+{} {} EXP", amount, track.name()),
            EngineEvent::ExpLost { track, amount } => println!("-{} {} EXP", amount, track.name()),
            EngineEvent::GoldEarned { amount } => println!("+{} gold", amount),
            EngineEvent::RestTaken { track, penalty, .. } => {
                println!("You took a break. {} lost {} EXP.", track.label(), penalty)
            }
            EngineEvent::TaskReopened { .. } => println!("Task reopened."),
            EngineEvent::TaskDeleted { .. } => println!("Task deleted."),
            EngineEvent::MissionBurned { .. } => println!("A mission in this week's pool burned away."),
            EngineEvent::StreakBonus { track, amount } => {
                println!("Streak bonus: +{} {} EXP", amount, track.name())
            }
            EngineEvent::PoolReplaced { week_id, missions } => {
                println!("{} missions ready for {}", missions, week_id)
            }
            EngineEvent::BossDamaged { damage, hp_left, .. } => {
                println!("The boss takes {} damage ({} HP left)", damage, hp_left)
            }
            EngineEvent::BossDefeated {
                name,
                reward_gold,
                exp_per_track,
                ..
            } => println!(
                "{} DEFEATED! +{} gold, +{} EXP to every track",
                name, reward_gold, exp_per_track
            ),
            EngineEvent::IdleCollected { amount } => println!("Collected {} idle gold", amount),
            EngineEvent::ShopMonthReset { month } => println!("New month {}: prices reset", month),
            EngineEvent::ItemPurchased { item, cost } => println!("Bought {} for {} gold", item, cost),
            EngineEvent::SkipTicketUsed { remaining } => {
                println!("Used a skip ticket ({} left)", remaining)
            }
            EngineEvent::TasksSkipped {
                count,
                penalty_total,
                waived,
            } => {
                if *waived {
                    println!("Skipped {} task(s) without penalty", count)
                } else {
                    println!("Skipped {} task(s), {} EXP penalty", count, penalty_total)
                }
            }
            EngineEvent::TaskCompleted { reward, overdue, .. } => {
                if *overdue {
                    println!("Completed late: reward reduced to {}", reward)
                } else {
                    println!("Completed! Reward {}", reward)
                }
            }
            EngineEvent::MissionAccepted { .. } => {}
        }
    }
}
