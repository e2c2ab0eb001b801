// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::fs::File;
use std::process;

use clap::{App, Arg, ArgMatches, SubCommand};

use minichess::{
    run_self_test, validate_all, BatchOptions, Color, Position, PuzzleLibrary, Session,
    ValidationReport,
};

const EXIT_CONTENT_FAILURE: i32 = 1;
const EXIT_SELF_TEST_FAILURE: i32 = 2;
const EXIT_LOAD_ERROR: i32 = 3;

fn main() {
    env_logger::init();
    let file_arg = Arg::with_name("FILE")
        .help("JSON file of puzzles")
        .required(true)
        .index(1);
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("validate")
                .about("Validate every puzzle in a puzzle file")
                .arg(file_arg.clone())
                .arg(
                    Arg::with_name("dev")
                        .help("Run the move generator self-test first")
                        .long("--dev"),
                )
                .arg(
                    Arg::with_name("serial")
                        .help("Validate puzzles one at a time")
                        .long("--serial"),
                )
                .arg(
                    Arg::with_name("csv")
                        .help("Write a per-puzzle report to a CSV file")
                        .value_name("OUT")
                        .long("--csv")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("json")
                        .help("Print the report as JSON")
                        .long("--json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Print a puzzle's starting position and solution")
                .arg(file_arg)
                .arg(
                    Arg::with_name("ID")
                        .help("Puzzle id")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(SubCommand::with_name("selftest").about("Run the move generator self-test"))
        .subcommand(
            SubCommand::with_name("moves")
                .about("List the legal moves in a board diagram")
                .arg(
                    Arg::with_name("DIAGRAM")
                        .help("Piece placement, e.g. 3pk/R4/5/5/K4")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("side")
                        .help("Side to move")
                        .value_name("SIDE")
                        .short("-s")
                        .long("--side")
                        .possible_values(&["w", "b"])
                        .default_value("w"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("validate", Some(matches)) => run_validate(matches),
        ("show", Some(matches)) => run_show(matches),
        ("selftest", Some(_)) => run_selftest(),
        ("moves", Some(matches)) => run_moves(matches),
        _ => {
            eprintln!("{}", matches.usage());
            process::exit(EXIT_CONTENT_FAILURE);
        }
    }
}

fn load(matches: &ArgMatches) -> PuzzleLibrary {
    let path = matches.value_of("FILE").unwrap_or_default();
    match PuzzleLibrary::from_path(path) {
        Ok(library) => library,
        Err(err) => {
            eprintln!("error: {}: {}", path, err);
            process::exit(EXIT_LOAD_ERROR);
        }
    }
}

fn run_validate(matches: &ArgMatches) -> ! {
    let library = load(matches);
    let options = BatchOptions {
        dev_mode: matches.is_present("dev"),
        parallel: !matches.is_present("serial"),
    };
    let report = validate_all(library.all(), &options);

    if let Some(out) = matches.value_of("csv") {
        let written = File::create(out)
            .map_err(csv::Error::from)
            .and_then(|file| report.write_csv(file));
        if let Err(err) = written {
            eprintln!("error: failed to write {}: {}", out, err);
            process::exit(EXIT_LOAD_ERROR);
        }
    }

    if matches.is_present("json") {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("error: failed to serialize report: {}", err);
                process::exit(EXIT_LOAD_ERROR);
            }
        }
    } else {
        print_report(&report);
    }

    if !report.is_trustworthy() {
        process::exit(EXIT_SELF_TEST_FAILURE);
    }

    if !report.all_passed() {
        process::exit(EXIT_CONTENT_FAILURE);
    }

    process::exit(0);
}

fn print_report(report: &ValidationReport) {
    if report.self_test.ran {
        let status = if report.self_test.passed { "passed" } else { "FAILED" };
        println!("self-test: {}", status);
        for err in &report.self_test.errors {
            println!("  - {}", err);
        }
    } else {
        println!("self-test: skipped");
    }

    for result in report.failures() {
        println!("{}: FAILED", result.puzzle_id);
        for err in &result.errors {
            println!("  - {}", err);
        }

        if let Some(index) = result.failing_move_index {
            println!("  failing move index: {}", index);
        }
    }

    println!(
        "passed {}/{}",
        report.passed_puzzles, report.total_puzzles
    );
}

fn run_show(matches: &ArgMatches) -> ! {
    let library = load(matches);
    let id = matches.value_of("ID").unwrap_or_default();
    let puzzle = match library.by_id(id) {
        Some(puzzle) => puzzle,
        None => {
            eprintln!("error: no puzzle with id {}", id);
            process::exit(EXIT_LOAD_ERROR);
        }
    };

    println!("{} ({}, {})", puzzle.title, puzzle.id, puzzle.pack);
    println!(
        "{} board, {} to move, {} in {}",
        puzzle.size,
        puzzle.side_to_move_first.name(),
        puzzle.objective.kind,
        puzzle.objective.depth
    );
    println!();
    println!("{}", puzzle.start_position());
    println!("diagram: {}", puzzle.start_position().as_fen());
    println!();

    let mut session = Session::new(puzzle);
    println!("{}", session.hint());
    while !session.is_complete() {
        let index = session.line_index();
        let next = &puzzle.line[index];
        if session.reply_pending() {
            session.play_reply();
        } else {
            session.attempt(next.from, next.to, next.promotion);
        }

        if session.line_index() == index {
            println!("line stops at unplayable move {}: {}", index, next.notation());
            break;
        }
    }

    for entry in session.history() {
        println!(
            "{:>3}. {:<10} {}",
            entry.move_number,
            entry.white.unwrap_or_else(|| "...".to_owned()),
            entry.black.unwrap_or_default()
        );
    }

    match session.outcome() {
        Some(outcome) => println!("outcome: {:?}", outcome),
        None => println!("outcome: incomplete"),
    }

    process::exit(0);
}

fn run_selftest() -> ! {
    let result = run_self_test();
    if result.passed {
        println!("self-test passed");
        process::exit(0);
    }

    println!("self-test FAILED");
    for err in &result.errors {
        println!("  - {}", err);
    }

    process::exit(EXIT_SELF_TEST_FAILURE);
}

fn run_moves(matches: &ArgMatches) -> ! {
    let diagram = matches.value_of("DIAGRAM").unwrap_or_default();
    let side = match matches.value_of("side") {
        Some("b") => Color::Black,
        _ => Color::White,
    };
    let pos = match Position::from_fen(diagram) {
        Ok(pos) => pos,
        Err(err) => {
            eprintln!("error: invalid diagram: {}", err);
            process::exit(EXIT_LOAD_ERROR);
        }
    };

    println!("{}", pos);
    let moves = pos.legal_moves(side);
    println!("{} legal moves for {}", moves.len(), side.name());
    for mov in &moves {
        println!("  {}", mov);
    }

    if pos.is_checkmate(side) {
        println!("{} is checkmated", side.name());
    } else if pos.is_stalemate(side) {
        println!("{} is stalemated", side.name());
    } else if pos.is_check(side) {
        println!("{} is in check", side.name());
    }

    process::exit(0);
}
