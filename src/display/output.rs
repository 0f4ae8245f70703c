use crate::analysis::coaching::{Coaching, Priority};
use crate::analysis::grader::Grade;
use crate::analysis::report::{ClanReport, PlayerReport};
use crate::analysis::synergy;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    number: String,
    placement: String,
    grade: String,
    top: String,
    #[tabled(rename = "team score")]
    team_score: String,
}

#[derive(Tabled)]
struct SynergyRow {
    rank: String,
    teammate: String,
    games: String,
    #[tabled(rename = "above bar")]
    above_bar: String,
}

#[derive(Tabled)]
struct MemberRow {
    member: String,
    style: String,
    damage: String,
    kills: String,
    survival: String,
    rounds: String,
}

fn colored_grade(grade: Grade) -> String {
    let label = grade.label();
    match grade {
        Grade::SssPlus | Grade::Ss => label.magenta().bold().to_string(),
        Grade::S | Grade::A => label.green().to_string(),
        Grade::B => label.cyan().to_string(),
        Grade::C => label.yellow().to_string(),
        Grade::CMinus => label.red().to_string(),
        Grade::NotAvailable => label.dimmed().to_string(),
    }
}

fn minutes(seconds: f64) -> String {
    format!("{}m {:02}s", (seconds / 60.0) as u64, (seconds % 60.0) as u64)
}

pub fn display_player_report(report: &PlayerReport) {
    let m = &report.metrics;

    println!(
        "\n{}",
        format!("🎮 Player Analysis for {}", report.player).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if m.rounds_considered == 0 {
        println!("{}", "No usable match data for this player".yellow());
    }

    println!(
        "{} {} {}",
        "Play style:".bold(),
        report.archetype.icon,
        report.archetype.label.bold()
    );
    println!(
        "{} {:.0} dmg | {:.2} kills | {:.2} assists | {} survived",
        "Averages:".bold(),
        m.avg_damage,
        m.avg_kills,
        m.avg_assists,
        minutes(m.avg_survival_time)
    );
    println!(
        "{} {:.1}% wins | {:.1}% top 10 | {} rounds | MMR {:.0}\n",
        "Results:".bold(),
        m.win_rate_percent,
        m.top10_rate_percent,
        m.rounds_considered,
        report.mmr
    );

    display_match_grades(report);
    display_synergy(report);
    display_squad(report);
    display_coaching(&report.coaching);
}

fn display_match_grades(report: &PlayerReport) {
    if report.grades.is_empty() {
        return;
    }

    println!("{}", format!("📊 MATCH GRADES (Last {} Games)", report.grades.len()).bold().cyan());

    let rows: Vec<MatchRow> = report
        .grades
        .iter()
        .enumerate()
        .map(|(idx, g)| MatchRow {
            number: format!("{}", idx + 1),
            placement: format!("{}/{}", g.placement, g.total_competing_teams),
            grade: colored_grade(g.grade),
            top: g.top_percent.map(|p| format!("{:.0}%", p)).unwrap_or_else(|| "-".to_string()),
            team_score: format!("{:.0}", g.team_score),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn display_synergy(report: &PlayerReport) {
    let top = synergy::top(&report.synergy);
    if top.is_empty() {
        return;
    }

    println!("{}", "👥 TEAMMATE SYNERGY".bold().cyan());

    let rows: Vec<SynergyRow> = top
        .iter()
        .enumerate()
        .map(|(idx, entry)| SynergyRow {
            rank: format!("#{}", idx + 1),
            teammate: entry.teammate_name.clone(),
            games: entry.co_occurrence_count.to_string(),
            above_bar: format!("{} ({:.0}%)", entry.above_bar_count, entry.above_bar_rate()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn display_squad(report: &PlayerReport) {
    let Some(squad) = &report.squad else {
        return;
    };

    println!("{}", "🪖 RECOMMENDED SQUAD".bold().cyan());
    println!(
        "  {}: avg team score {:.0} over {} games",
        squad.teammate_names.join(", ").bold(),
        squad.average_team_score,
        squad.occurrence_count
    );
    if let Some(last) = squad.most_recent_match {
        println!("  Last played together {}", last.format("%Y-%m-%d %H:%M UTC"));
    }
    println!();
}

fn display_coaching(coaching: &Coaching) {
    if coaching.recommendations.is_empty() && coaching.strengths.is_empty() && coaching.weaknesses.is_empty() {
        return;
    }

    println!("{}", "🧑‍🏫 COACHING".bold().cyan());
    for rec in &coaching.recommendations {
        let tag = match rec.priority {
            Priority::High => "HIGH".red().bold(),
            Priority::Medium => "MED".yellow().bold(),
            Priority::Low => "LOW".green(),
        };
        println!("  [{}] {}", tag, rec.message);
    }
    for s in &coaching.strengths {
        println!("  {} {}", "+".green().bold(), s);
    }
    for w in &coaching.weaknesses {
        println!("  {} {}", "-".red().bold(), w);
    }
    println!();
}

pub fn display_clan_report(report: &ClanReport) {
    let m = &report.metrics;

    println!("\n{}", "🏰 Clan Analysis".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!(
        "{} {} {} ({} of {} members with data)",
        "Clan style:".bold(),
        report.archetype.icon,
        report.archetype.label.bold(),
        report.active_members,
        report.members.len()
    );
    println!(
        "{} {:.0} dmg | {:.2} kills | {:.1}% wins | {:.1}% top 10\n",
        "Member averages:".bold(),
        m.avg_damage,
        m.avg_kills,
        m.win_rate_percent,
        m.top10_rate_percent
    );

    let rows: Vec<MemberRow> = report
        .members
        .iter()
        .map(|member| MemberRow {
            member: member.name.clone(),
            style: format!("{} {}", member.archetype.icon, member.archetype.label),
            damage: format!("{:.0}", member.metrics.avg_damage),
            kills: format!("{:.2}", member.metrics.avg_kills),
            survival: minutes(member.metrics.avg_survival_time),
            rounds: member.metrics.rounds_considered.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
