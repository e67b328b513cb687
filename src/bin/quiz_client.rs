// src/bin/quiz_client.rs

//! Terminal front-end: sign in, manage quizzes and take them.
//! Answers are graded locally; nothing about an attempt reaches the server.

use std::{
    env, fs,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use dotenvy::dotenv;
use quiz_backend::{
    client::{ClientError, QuizClient},
    models::{
        quiz::{MAX_POINTS, Question, QuestionType, Quiz, QuizDto},
        user::RegisterRequest,
    },
    scoring::{AnswerSet, Grade, ScoreReport, score_quiz},
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: quiz-client <command>

  register <email> <password> [first-name] [last-name]
  login <email> <password>        prints a token; export it as QUIZ_TOKEN
  list
  take <id>
  author                          builds a quiz interactively and saves it
  create <quiz.json>
  update <id> <quiz.json>
  delete <id>

environment: QUIZ_API_URL (default http://localhost:3000), QUIZ_TOKEN";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let base_url = env::var("QUIZ_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let mut client = QuizClient::new(base_url);
    if let Ok(token) = env::var("QUIZ_TOKEN") {
        client = client.with_token(token);
    }

    match run(&mut client, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &mut QuizClient, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let arg = |i: usize| args.get(i).map(String::as_str);

    match (arg(0), arg(1), arg(2)) {
        (Some("register"), Some(email), Some(password)) => {
            let request = RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                first_name: arg(3).unwrap_or_default().to_string(),
                last_name: arg(4).unwrap_or_default().to_string(),
            };
            client.register(&request).await?;
            println!("Registered {}", email);
        }
        (Some("login"), Some(email), Some(password)) => {
            let token = client.login(email, password).await?;
            println!("{}", token);
        }
        (Some("list"), _, _) => {
            for quiz in client.list_quizzes().await? {
                println!(
                    "{:>4}  {} ({} questions)\n      {}",
                    quiz.quiz_id, quiz.title, quiz.question_count, quiz.description
                );
            }
        }
        (Some("take"), Some(id), _) => {
            let quiz = client.get_quiz(id.parse()?).await?;
            take(&quiz)?;
        }
        (Some("author"), _, _) => {
            let quiz = author()?;
            let created = client.create_quiz(&quiz).await?;
            println!("Created quiz {}", created.id);
        }
        (Some("create"), Some(path), _) => {
            let quiz = read_quiz_file(path)?;
            let created = client.create_quiz(&quiz).await?;
            println!("Created quiz {}", created.id);
        }
        (Some("update"), Some(id), Some(path)) => {
            let mut quiz = read_quiz_file(path)?;
            quiz.id = id.parse()?;
            client.update_quiz(&quiz).await?;
            println!("Updated quiz {}", quiz.id);
        }
        (Some("delete"), Some(id), _) => {
            match client.delete_quiz(id.parse()?).await {
                Err(ClientError::Api { status, .. }) if status.as_u16() == 404 => {
                    println!("Quiz {} does not exist", id);
                }
                other => {
                    other?;
                    println!("Deleted quiz {}", id);
                }
            }
        }
        _ => {
            eprintln!("{}", USAGE);
        }
    }
    Ok(())
}

fn read_quiz_file(path: &str) -> Result<Quiz, Box<dyn std::error::Error>> {
    let dto: QuizDto = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(Quiz::from(dto))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// The one option picked for a single-choice question.
/// `None` when more than one option is named, so the caller can ask again.
fn parse_single_choice(input: &str, option_count: usize) -> Option<Option<usize>> {
    match parse_choices(input, option_count).as_slice() {
        [] => Some(None),
        [n] => Some(Some(*n)),
        _ => None,
    }
}

/// Option numbers typed by the user ("1", "1,3", "2 4"), converted to indexes.
/// Anything unreadable or out of range is dropped.
fn parse_choices(input: &str, option_count: usize) -> Vec<usize> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|part| part.parse::<usize>().ok())
        .filter(|n| (1..=option_count).contains(n))
        .map(|n| n - 1)
        .collect()
}

fn collect_answers(quiz: &Quiz) -> io::Result<AnswerSet> {
    let mut answers = AnswerSet::new();

    println!("\n{}\n{}\n", quiz.title, quiz.description);
    for (index, question) in quiz.questions.iter().enumerate() {
        let points = question.effective_points();
        println!(
            "{}. {} [{} pt{}]",
            index + 1,
            question.text,
            points,
            if points == 1 { "" } else { "s" }
        );

        match question.question_type {
            QuestionType::Text => {
                answers.set_text(question.id, prompt("   answer: ")?);
            }
            QuestionType::SingleChoice | QuestionType::MultipleChoice => {
                for (n, option) in question.options.iter().enumerate() {
                    println!("   {}) {}", n + 1, option.text);
                }
                let count = question.options.len();
                if question.question_type == QuestionType::SingleChoice {
                    let picked = loop {
                        match parse_single_choice(&prompt("   pick one: ")?, count) {
                            Some(picked) => break picked,
                            None => println!("   only one option can be picked"),
                        }
                    };
                    if let Some(n) = picked {
                        answers.select_single(question.id, question.options[n].id);
                    }
                } else {
                    for n in parse_choices(&prompt("   pick any (e.g. 1,3): ")?, count) {
                        answers.toggle_option(question.id, question.options[n].id, true);
                    }
                }
            }
        }
        println!();
    }
    Ok(answers)
}

fn print_report(quiz: &Quiz, report: &ScoreReport) {
    let verdict = match report.grade() {
        Grade::Excellent => "Excellent",
        Grade::Pass => "Passed",
        Grade::Fail => "Keep practising",
    };
    println!(
        "Quiz completed! {} / {} pts, you scored {}% ({})\n",
        report.earned, report.possible, report.percentage, verdict
    );

    println!("Answer sheet");
    for (index, (question, result)) in quiz.questions.iter().zip(&report.questions).enumerate() {
        println!(
            "{} {}. {}  {} / {}",
            if result.correct { "✓" } else { "✗" },
            index + 1,
            question.text,
            result.points_earned,
            result.points_possible
        );
        match question.question_type {
            QuestionType::Text => {
                println!(
                    "     your answer: {}",
                    result.submitted_text.as_deref().unwrap_or("(no answer)")
                );
                println!(
                    "     correct answer: {}",
                    result.correct_text.as_deref().unwrap_or_default()
                );
            }
            QuestionType::SingleChoice | QuestionType::MultipleChoice => {
                for option in &question.options {
                    let selected = result.selected_option_ids.contains(&option.id);
                    let mark = match (option.is_correct, selected) {
                        (true, _) => "✓",
                        (false, true) => "✗",
                        (false, false) => " ",
                    };
                    println!(
                        "   {} {}{}",
                        mark,
                        option.text,
                        if selected { "  (your answer)" } else { "" }
                    );
                }
            }
        }
    }
}

/// Builds one question the way the editor does: the type is set first (a text
/// question gets its single accepted-answer option), then options are added
/// and flagged. Flagging several options of a single-choice question keeps
/// only the last one.
fn build_question(
    text: &str,
    question_type: QuestionType,
    points: i32,
    option_texts: &[String],
    correct: &[usize],
    accepted: &str,
) -> Question {
    let mut question = Question {
        text: text.trim().to_string(),
        points,
        ..Question::default()
    };
    question.set_type(question_type);

    if question_type == QuestionType::Text {
        question.options[0].text = accepted.trim().to_string();
    } else {
        for option in option_texts {
            question.add_option(option.trim());
        }
        for &index in correct {
            question.mark_correct(index, true);
        }
    }
    question
}

fn prompt_question_type() -> io::Result<QuestionType> {
    loop {
        let input = prompt("   type [0 single, 1 multiple, 2 text]: ")?;
        match input.trim().parse::<i64>().map(QuestionType::try_from) {
            Ok(Ok(question_type)) => return Ok(question_type),
            _ => println!("   enter 0, 1 or 2"),
        }
    }
}

fn prompt_points() -> io::Result<i32> {
    loop {
        let input = prompt(&format!("   points [1-{}, default 1]: ", MAX_POINTS))?;
        if input.trim().is_empty() {
            return Ok(1);
        }
        match input.trim().parse::<i32>() {
            Ok(points) if (1..=MAX_POINTS).contains(&points) => return Ok(points),
            _ => println!("   enter a number from 1 to {}", MAX_POINTS),
        }
    }
}

/// Interactive quiz editor. Asks again until the answer key passes the editor check.
fn author() -> io::Result<Quiz> {
    let mut quiz = Quiz {
        title: prompt("title: ")?.trim().to_string(),
        description: prompt("description: ")?.trim().to_string(),
        ..Quiz::default()
    };

    loop {
        let number = quiz.questions.len() + 1;
        let text = prompt(&format!("\nquestion {} text (empty to finish): ", number))?;
        if text.trim().is_empty() {
            break;
        }
        let question_type = prompt_question_type()?;
        let points = prompt_points()?;

        let question = loop {
            let question = if question_type == QuestionType::Text {
                let accepted = prompt("   accepted answer: ")?;
                build_question(&text, question_type, points, &[], &[], &accepted)
            } else {
                let mut option_texts = Vec::new();
                loop {
                    let label = format!("   option {} (empty to stop): ", option_texts.len() + 1);
                    let option = prompt(&label)?;
                    if option.trim().is_empty() {
                        break;
                    }
                    option_texts.push(option);
                }
                let correct = parse_choices(
                    &prompt("   correct option number(s): ")?,
                    option_texts.len(),
                );
                build_question(&text, question_type, points, &option_texts, &correct, "")
            };

            let single = Quiz {
                questions: vec![question.clone()],
                ..Quiz::default()
            };
            match single.check_answer_key() {
                Ok(()) => break question,
                Err(e) => println!("   {}", e.to_string().replacen("Question 1", "This question", 1)),
            }
        };
        quiz.questions.push(question);
    }

    Ok(quiz)
}

fn take(quiz: &Quiz) -> io::Result<()> {
    loop {
        let answers = collect_answers(quiz)?;
        let report = score_quiz(quiz, &answers);
        print_report(quiz, &report);

        let again = prompt("\nRetake quiz? [y/N] ")?;
        if !again.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}
