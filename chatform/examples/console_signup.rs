//! A signup form driven from the terminal.
//!
//! Every stdin line is treated as a message from one user in one chat.
//! Prompts are printed to stdout.
//!
//! Run with `cargo run --example console_signup -p chatform`.

use async_trait::async_trait;
use chatform::prelude::*;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Transport that prints to the terminal.
struct StdoutTransport {
    next_id: AtomicU64,
}

impl StdoutTransport {
    fn handle(&self, chat: &ChatId) -> MessageHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        MessageHandle::new(chat.clone(), id.to_string())
    }
}

#[async_trait]
impl Transport for StdoutTransport {
    async fn send_prompt(
        &self,
        chat: &ChatId,
        content: &Content,
        decoration: Option<&Decoration>,
    ) -> Result<MessageHandle, TransportError> {
        println!("bot> {}", content.as_text().unwrap_or("<rich prompt>"));
        if let Some(decoration) = decoration {
            println!("     {}", decoration.payload());
        }
        Ok(self.handle(chat))
    }

    async fn send_text(&self, chat: &ChatId, text: &str) -> Result<MessageHandle, TransportError> {
        println!("bot> {text}");
        Ok(self.handle(chat))
    }
}

#[derive(Debug, serde::Deserialize)]
struct Signup {
    name: String,
    age: i64,
    email: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let email = Regex::new(r"^[^@\s]+@[^@\s]+\.[a-z]+$")?;

    let mut forms = FormRegistry::new();
    forms.register(
        FormBuilder::new("signup")
            .field(Field::text("name", "What is your name?"))
            .field(
                Field::integer("age", "How old are you?")
                    .with_rule(Rule::sync(|message, _| {
                        let age = message
                            .text
                            .as_deref()
                            .and_then(|t| t.trim().parse::<i64>().ok());
                        Ok(match age {
                            Some(age) if (1..150).contains(&age) => serde_json::json!(age),
                            _ => serde_json::Value::Bool(false),
                        })
                    }))
                    .with_failure_text("Please send your age as a number."),
            )
            .field(
                Field::text(
                    "email",
                    Prompt::from_fn(|request: PromptRequest| async move {
                        let name = request
                            .value("name")
                            .and_then(|v| v.as_str())
                            .unwrap_or("friend");
                        Ok(Content::text(format!("Thanks {name}. Your email?")))
                    }),
                )
                .with_rule(Pattern::text().matches(email))
                .with_failure_text("That does not look like an email address."),
            ),
        SubmitBinding::from_fn(|submission| async move {
            let signup: Signup = submission.decode()?;
            println!("submitted: {signup:?}");
            Ok(())
        }),
    )?;

    let engine = FormEngine::new(
        forms,
        Arc::new(MemoryStore::new()),
        Arc::new(StdoutTransport {
            next_id: AtomicU64::new(1),
        }),
    );

    let key = SessionKey::new("console", "me");
    let context = ContextBag::new();
    engine.start(&FormId::new("signup"), &key, &context).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = Message::text("console", "me", line);
        match engine.handle_message(&message, &context).await {
            Ok(Handled::Submitted { .. }) => break,
            Ok(Handled::Ignored) => println!("(no form is waiting)"),
            Ok(_) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}
