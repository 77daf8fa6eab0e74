//! 终端界面
//!
//! 负责输入 API key、选择考试方向、渲染题目与解析、读取命令。
//! 不持有任何会话状态，所有状态转换都委托给 [`QuizFlow`]。

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ExamTopic, Label, Question, UserSelection};
use crate::services::LlmService;
use crate::utils::logging;
use crate::workflow::{Phase, QuizFlow};

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate,
    Toggle(Label),
    Submit,
    /// 不带参数时列出可选方向
    Topic(Option<String>),
    Key,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };

        match head.to_ascii_lowercase().as_str() {
            "g" | "generate" => Some(Command::Generate),
            "s" | "submit" => Some(Command::Submit),
            "t" | "topic" => Some(Command::Topic(rest.map(str::to_string))),
            "k" | "key" => Some(Command::Key),
            "h" | "help" | "?" => Some(Command::Help),
            "q" | "quit" | "exit" => Some(Command::Quit),
            other => other.parse::<Label>().ok().map(Command::Toggle),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    flow: QuizFlow<LlmService>,
    input: Lines<BufReader<Stdin>>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let topic = config.topic()?;
        logging::log_startup(&config, topic);

        let mut app = Self {
            flow: QuizFlow::new(topic),
            input: BufReader::new(tokio::io::stdin()).lines(),
            config,
        };

        let api_key = match app.config.llm_api_key.clone() {
            Some(key) => Some(key),
            None => app.ask_api_key().await?,
        };
        app.apply_api_key(api_key);

        Ok(app)
    }

    /// 运行命令循环，直到用户退出或输入结束
    pub async fn run(mut self) -> AppResult<()> {
        println!("\n{}", render_title(self.flow.topic()));
        println!("You selected {}", self.flow.topic());
        println!("{}", HELP_TEXT);

        loop {
            let Some(line) = self.read_line("> ").await? else {
                break;
            };
            let Some(command) = Command::parse(&line) else {
                if !line.trim().is_empty() {
                    println!("Unknown command. Type h for help.");
                }
                continue;
            };

            match command {
                Command::Quit => break,
                Command::Help => println!("{}", HELP_TEXT),
                Command::Key => {
                    let api_key = self.ask_api_key().await?;
                    self.apply_api_key(api_key);
                }
                Command::Topic(name) => self.change_topic(name),
                Command::Generate => self.generate().await,
                Command::Toggle(label) => self.toggle(label),
                Command::Submit => self.submit().await,
            }
        }

        info!("👋 程序结束");
        Ok(())
    }

    async fn generate(&mut self) {
        if !self.flow.has_client() {
            show_error(&crate::error::SessionError::MissingCredential.into());
            return;
        }
        if !self.flow.can_generate() {
            println!("Finish the current question first.");
            return;
        }

        println!("Generating a question...");
        let outcome = self.flow.request_question().await.map(|_| ());
        match outcome {
            Ok(()) => self.show_question(),
            Err(e) => show_error(&e),
        }
    }

    fn toggle(&mut self, label: Label) {
        match self.flow.toggle_option(label) {
            Ok(_) => self.show_question(),
            Err(e) => show_error(&e),
        }
    }

    async fn submit(&mut self) {
        if self.flow.session().phase() == Phase::AwaitingAnswer && !self.flow.can_submit() {
            println!("Select at least one option before submitting.");
            return;
        }

        println!("Checking your answer...");
        let explanation = match self.flow.submit_answer().await {
            Ok(grading) => grading.text().to_string(),
            Err(e) => {
                show_error(&e);
                return;
            }
        };

        println!("\nAnswer and Explanation:\n{}\n", explanation);

        if let Err(e) = self.flow.acknowledge() {
            warn!("⚠️ 重置会话失败: {}", e);
        }
        println!("Type g to generate the next question.");
    }

    fn change_topic(&mut self, name: Option<String>) {
        let Some(name) = name else {
            println!("{}", render_topic_menu(self.flow.topic()));
            return;
        };

        match name.parse::<ExamTopic>() {
            Ok(topic) => match self.flow.set_topic(topic) {
                Ok(()) => {
                    println!("\n{}", render_title(topic));
                    println!("You selected {}", topic);
                }
                Err(e) => show_error(&e.into()),
            },
            Err(e) => println!("{}", e),
        }
    }

    fn show_question(&self) {
        let session = self.flow.session();
        if let Some(question) = session.question() {
            println!("\n{}", render_question(question, session.selection()));
        }
    }

    fn apply_api_key(&mut self, api_key: Option<String>) {
        match api_key {
            Some(key) => {
                self.flow.configure(Some(LlmService::new(&self.config, &key)));
                println!("API key loaded successfully!");
            }
            None => {
                self.flow.configure(None);
                println!("Please enter an API key to continue.");
            }
        }
    }

    async fn ask_api_key(&mut self) -> AppResult<Option<String>> {
        let key = self.read_line("Enter your Gemini API key: ").await?;
        Ok(key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty()))
    }

    async fn read_line(&mut self, prompt: &str) -> AppResult<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        Ok(self.input.next_line().await?)
    }
}

const HELP_TEXT: &str = "Commands: g = generate question, a/b/c/d = toggle option, \
s = submit answer, t [name|number] = choose exam, k = re-enter API key, h = help, q = quit";

fn show_error(err: &AppError) {
    println!("Error: {}", err.user_message());
}

pub fn render_title(topic: ExamTopic) -> String {
    format!("{} Exam Practice", topic)
}

pub fn render_topic_menu(current: ExamTopic) -> String {
    let mut out = String::from("Which Certification Exam would you like to practice for?");
    for (i, topic) in ExamTopic::ALL.iter().enumerate() {
        let marker = if *topic == current { "*" } else { " " };
        out.push_str(&format!("\n {} {}. {}", marker, i + 1, topic));
    }
    out
}

/// 渲染题目，选项按 A/B、C/D 两列排布
pub fn render_question(question: &Question, selection: &UserSelection) -> String {
    let cell = |label: Label| {
        let mark = if selection.contains(label) { "[x]" } else { "[ ]" };
        format!("{} {}: {}", mark, label, question.option(label))
    };

    format!(
        "Question:\n{}\n\nOptions:\n{:<40} {}\n{:<40} {}",
        question.text(),
        cell(Label::A),
        cell(Label::B),
        cell(Label::C),
        cell(Label::D),
    )
}
