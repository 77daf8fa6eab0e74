use std::collections::VecDeque;
use std::sync::Mutex;

use exam_practice_qna::error::{LlmError, SessionError};
use exam_practice_qna::{AppError, ExamTopic, Label, ModelClient, Phase, QuizFlow};

const QUESTION_TEXT: &str = "Question: What is 2+2?\nA: 3\nB: 4\nC: 5\nD: 6";

/// 按顺序返回预设响应，并记录收到的提示词
#[derive(Default)]
struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ModelClient for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

impl ModelClient for &ScriptedModel {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }
}

fn unavailable() -> LlmError {
    LlmError::ApiCallFailed {
        model: "scripted".to_string(),
        source: "connection refused".into(),
    }
}

#[tokio::test]
async fn test_full_question_cycle() {
    let model = ScriptedModel::new(vec![
        Ok(QUESTION_TEXT.to_string()),
        Ok("Correct Answer(s): ['B']\nExplanation for correct option(s): 2+2=4".to_string()),
    ]);
    let mut flow = QuizFlow::with_client(&model, ExamTopic::AwsSolutionArchitectAssociate);

    assert!(flow.can_generate());
    let question = flow.request_question().await.unwrap();
    assert_eq!(question.text(), "What is 2+2?");
    assert_eq!(question.option(Label::B), "4");
    assert_eq!(flow.session().phase(), Phase::AwaitingAnswer);
    assert!(!flow.can_generate());
    assert!(!flow.can_submit());

    flow.toggle_option(Label::B).unwrap();
    assert!(flow.can_submit());

    let grading = flow.submit_answer().await.unwrap();
    assert!(grading.text().starts_with("Correct Answer(s): ['B']"));
    assert_eq!(flow.session().phase(), Phase::Graded);

    flow.acknowledge().unwrap();
    assert_eq!(flow.session().phase(), Phase::Idle);
    assert!(flow.session().question().is_none());
    assert!(flow.can_generate());

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("You are an expert in AWS Solution Architect Associate exams."));
    assert!(prompts[1].contains("Question: What is 2+2?"));
    assert!(prompts[1].contains("User's answer: ['B']"));
}

#[tokio::test]
async fn test_missing_credential_blocks_generation() {
    let mut flow: QuizFlow<ScriptedModel> = QuizFlow::new(ExamTopic::default());

    assert!(!flow.can_generate());
    let err = flow.request_question().await.unwrap_err();

    assert!(matches!(err, AppError::Session(SessionError::MissingCredential)));
    assert_eq!(flow.session().phase(), Phase::Idle);
}

#[tokio::test]
async fn test_parse_failure_leaves_session_idle() {
    let model = ScriptedModel::new(vec![
        Ok("Question: What is 2+2?\nA: 3\nB: 4\nC: 5".to_string()),
        Ok(QUESTION_TEXT.to_string()),
    ]);
    let mut flow = QuizFlow::with_client(&model, ExamTopic::default());

    let err = flow.request_question().await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "Failed to parse the question. Please try again."
    );
    assert_eq!(flow.session().phase(), Phase::Idle);

    assert!(flow.request_question().await.is_ok());
}

#[tokio::test]
async fn test_model_failure_leaves_session_idle() {
    let model = ScriptedModel::new(vec![Err(unavailable())]);
    let mut flow = QuizFlow::with_client(&model, ExamTopic::default());

    let err = flow.request_question().await.unwrap_err();

    assert!(err.is_model_unavailable());
    assert_eq!(flow.session().phase(), Phase::Idle);
    assert!(flow.can_generate());
}

#[tokio::test]
async fn test_second_request_rejected_while_question_active() {
    let model = ScriptedModel::new(vec![Ok(QUESTION_TEXT.to_string())]);
    let mut flow = QuizFlow::with_client(&model, ExamTopic::default());

    flow.request_question().await.unwrap();
    let err = flow.request_question().await.unwrap_err();

    assert!(matches!(err, AppError::Session(SessionError::QuestionAlreadyActive)));
    assert_eq!(model.prompts().len(), 1);
}

#[tokio::test]
async fn test_empty_selection_not_submitted() {
    let model = ScriptedModel::new(vec![Ok(QUESTION_TEXT.to_string())]);
    let mut flow = QuizFlow::with_client(&model, ExamTopic::default());
    flow.request_question().await.unwrap();

    let err = flow.submit_answer().await.unwrap_err();

    assert!(matches!(err, AppError::Session(SessionError::EmptySelection)));
    assert_eq!(flow.session().phase(), Phase::AwaitingAnswer);
    assert_eq!(model.prompts().len(), 1);
}

#[tokio::test]
async fn test_grading_failure_rolls_back_to_answering() {
    let model = ScriptedModel::new(vec![
        Ok(QUESTION_TEXT.to_string()),
        Err(unavailable()),
        Ok("Correct Answer(s): ['B']".to_string()),
    ]);
    let mut flow = QuizFlow::with_client(&model, ExamTopic::default());
    flow.request_question().await.unwrap();
    flow.toggle_option(Label::A).unwrap();
    flow.toggle_option(Label::C).unwrap();

    assert!(flow.submit_answer().await.is_err());
    assert_eq!(flow.session().phase(), Phase::AwaitingAnswer);

    // 回滚后可以修改答案并重新提交
    flow.toggle_option(Label::C).unwrap();
    assert!(flow.submit_answer().await.is_ok());

    let prompts = model.prompts();
    assert!(prompts[1].contains("User's answer: ['A', 'C']"));
    assert!(prompts[2].contains("User's answer: ['A']"));
}

#[tokio::test]
async fn test_topic_locked_during_cycle() {
    let model = ScriptedModel::new(vec![Ok(QUESTION_TEXT.to_string())]);
    let mut flow = QuizFlow::with_client(&model, ExamTopic::default());

    flow.set_topic(ExamTopic::AzureDataFundamentals).unwrap();
    flow.request_question().await.unwrap();

    assert_eq!(
        flow.set_topic(ExamTopic::AwsSolutionArchitectAssociate),
        Err(SessionError::TopicLocked)
    );
    assert_eq!(flow.topic(), ExamTopic::AzureDataFundamentals);
}
