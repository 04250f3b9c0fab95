//! Terminal front-end: renders the board and dispatches user intents.

use std::time::Instant;

use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::board::{Board, Prompt};
use crate::client::{ClientError, CoursesClient};
use crate::forms::{CourseForm, PostForm};

/// Yes/no confirmation backed by the terminal.
struct TermPrompt;

impl Prompt for TermPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

pub fn run(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = CoursesClient::new(base_url);
    let mut board = Board::default();
    board.refresh(&client)?;
    let mut prompt = TermPrompt;

    loop {
        render_courses(&board);

        let mut actions = vec!["Create course", "Quick add course"];
        if !board.courses().is_empty() {
            actions.extend(["Open posts", "Edit course", "Delete course"]);
        }
        actions.extend(["Refresh", "Quit"]);

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Action")
            .items(&actions)
            .default(0)
            .interact()?;

        match actions[choice] {
            "Create course" => create_course(&client, &mut board)?,
            "Quick add course" => quick_add(&client, &mut board)?,
            "Open posts" => {
                if let Some(id) = pick_course(&board, "Open posts for")? {
                    board.open_posts(&id);
                    posts_view(&client, &mut board, &mut prompt)?;
                }
            }
            "Edit course" => edit_course(&client, &mut board)?,
            "Delete course" => {
                if let Some(id) = pick_course(&board, "Delete which course")? {
                    match board.delete_course(&client, &mut prompt, &id) {
                        Ok(true) => println!("{}", "Course deleted.".green()),
                        Ok(false) => {}
                        Err(err) => report(&err),
                    }
                }
            }
            "Refresh" => {
                if let Err(err) = board.refresh(&client) {
                    report(&err);
                }
            }
            _ => return Ok(()),
        }
    }
}

fn render_courses(board: &Board) {
    let now = Instant::now();
    println!();
    println!("{}", "Study Posts".bold());
    if board.courses().is_empty() {
        println!(
            "{}",
            "No courses yet. Create one, then add posts inside it.".dimmed()
        );
        return;
    }
    for course in board.courses() {
        let title = if board.newly_added_course(now) == Some(course.id.as_str()) {
            course.title.green().bold()
        } else {
            course.title.bold()
        };
        let posts = match course.posts.len() {
            1 => "1 post".to_string(),
            n => format!("{n} posts"),
        };
        println!("  {title} ({posts})");
        if !course.description.is_empty() {
            println!("    {}", course.description.dimmed());
        }
    }
}

fn create_course(client: &CoursesClient, board: &mut Board) -> Result<(), dialoguer::Error> {
    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Course title")
        .allow_empty(true)
        .interact_text()?;
    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Description (optional)")
        .allow_empty(true)
        .interact_text()?;

    let form = CourseForm { title, description };
    match board.save_course(client, &form) {
        Ok(true) => println!("{}", "Course created.".green()),
        Ok(false) => println!("{}", "A title is required.".yellow()),
        Err(err) => report(&err),
    }
    Ok(())
}

fn quick_add(client: &CoursesClient, board: &mut Board) -> Result<(), dialoguer::Error> {
    board.quick_title = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Course name")
        .allow_empty(true)
        .interact_text()?;
    match board.quick_add(client) {
        Ok(true) => println!("{}", "Course created.".green()),
        Ok(false) => {
            board.cancel_quick_add();
            println!("{}", "A title is required.".yellow());
        }
        Err(err) => report(&err),
    }
    Ok(())
}

fn edit_course(client: &CoursesClient, board: &mut Board) -> Result<(), dialoguer::Error> {
    let Some(id) = pick_course(board, "Edit which course")? else {
        return Ok(());
    };
    board.start_course_edit(&id);
    let Some(course) = board.course_being_edited() else {
        return Ok(());
    };
    let prefill = CourseForm::prefilled(course);

    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Course title")
        .with_initial_text(prefill.title)
        .allow_empty(true)
        .interact_text()?;
    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Description (optional)")
        .with_initial_text(prefill.description)
        .allow_empty(true)
        .interact_text()?;

    let save = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save changes?")
        .default(true)
        .interact()?;
    if !save {
        board.cancel_course_edit();
        return Ok(());
    }

    let form = CourseForm { title, description };
    match board.save_course(client, &form) {
        Ok(true) => println!("{}", "Course updated.".green()),
        Ok(false) => {
            board.cancel_course_edit();
            println!("{}", "A title is required.".yellow());
        }
        Err(err) => report(&err),
    }
    Ok(())
}

fn posts_view(
    client: &CoursesClient,
    board: &mut Board,
    prompt: &mut TermPrompt,
) -> Result<(), dialoguer::Error> {
    loop {
        let Some(course) = board.active_course() else {
            return Ok(());
        };
        println!();
        println!("{} {}", "Posts in".bold(), course.title.bold());
        if course.posts.is_empty() {
            println!("{}", "No posts yet.".dimmed());
        }
        for post in &course.posts {
            println!("  {}", post.title.bold());
            println!("    {}", post.description.dimmed());
        }

        let mut actions = vec!["Add post"];
        if !course.posts.is_empty() {
            actions.extend(["Edit post", "Delete post"]);
        }
        actions.push("Close");

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Action")
            .items(&actions)
            .default(0)
            .interact()?;

        match actions[choice] {
            "Add post" => save_post(client, board, None)?,
            "Edit post" => {
                if let Some(id) = pick_post(board, "Edit which post")? {
                    save_post(client, board, Some(id))?;
                }
            }
            "Delete post" => {
                if let Some(id) = pick_post(board, "Delete which post")? {
                    match board.delete_post(client, prompt, &id) {
                        Ok(true) => println!("{}", "Post deleted.".green()),
                        Ok(false) => {}
                        Err(err) => report(&err),
                    }
                }
            }
            _ => {
                board.close_posts();
                return Ok(());
            }
        }
    }
}

fn save_post(
    client: &CoursesClient,
    board: &mut Board,
    edit_post_id: Option<String>,
) -> Result<(), dialoguer::Error> {
    let prefill = match &edit_post_id {
        Some(id) => {
            board.start_post_edit(id);
            match board.post_being_edited() {
                Some(post) => PostForm::prefilled(post),
                None => return Ok(()),
            }
        }
        None => PostForm::default(),
    };

    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Post title")
        .with_initial_text(prefill.title)
        .allow_empty(true)
        .interact_text()?;
    let image_url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Image (data URL or link)")
        .with_initial_text(prefill.image_url)
        .allow_empty(true)
        .interact_text()?;
    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Description")
        .with_initial_text(prefill.description)
        .allow_empty(true)
        .interact_text()?;

    let form = PostForm {
        title,
        image_url,
        description,
    };
    match board.save_post(client, &form) {
        Ok(true) => println!("{}", "Post saved.".green()),
        Ok(false) => {
            board.cancel_post_edit();
            println!(
                "{}",
                "Title, image, and description are all required.".yellow()
            );
        }
        Err(err) => report(&err),
    }
    Ok(())
}

fn pick_course(board: &Board, prompt: &str) -> Result<Option<String>, dialoguer::Error> {
    let mut items: Vec<String> = board.courses().iter().map(|c| c.title.clone()).collect();
    items.push("(cancel)".to_string());
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(board.courses().get(choice).map(|c| c.id.clone()))
}

fn pick_post(board: &Board, prompt: &str) -> Result<Option<String>, dialoguer::Error> {
    let Some(course) = board.active_course() else {
        return Ok(None);
    };
    let mut items: Vec<String> = course.posts.iter().map(|p| p.title.clone()).collect();
    items.push("(cancel)".to_string());
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(course.posts.get(choice).map(|p| p.id.clone()))
}

fn report(err: &ClientError) {
    println!("{} {err}", "error:".red().bold());
}
