use quiz_admin::{
    models::{AdminProfile, Answer, CreateQuestionRequest, Question, QuestionRow, Theme},
    validation::answers_are_valid,
};
use serde_json::json;

// --- Wire shapes ---

#[test]
fn test_question_serializes_with_nested_answers() {
    let question = Question {
        id: 7,
        title: "Largest ocean?".to_string(),
        theme_id: 2,
        answers: vec![Answer::new("Pacific", true), Answer::new("Atlantic", false)],
    };

    let value = serde_json::to_value(&question).unwrap();

    assert_eq!(
        value,
        json!({
            "id": 7,
            "title": "Largest ocean?",
            "theme_id": 2,
            "answers": [
                { "title": "Pacific", "is_correct": true },
                { "title": "Atlantic", "is_correct": false }
            ]
        })
    );
}

#[test]
fn test_answer_does_not_expose_storage_fields() {
    let value = serde_json::to_value(Answer::new("Pacific", true)).unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();

    assert_eq!(keys.len(), 2);
    assert!(value.get("question_id").is_none());
    assert!(value.get("id").is_none());
}

#[test]
fn test_create_question_request_deserializes() {
    let raw = r#"{
        "title": "What is the capital of France?",
        "theme_id": 1,
        "answers": [
            { "title": "Paris", "is_correct": true },
            { "title": "Lyon", "is_correct": false },
            { "title": "Nice", "is_correct": false }
        ]
    }"#;

    let request: CreateQuestionRequest = serde_json::from_str(raw).unwrap();

    assert_eq!(request.theme_id, 1);
    assert_eq!(request.answers.len(), 3);
    assert!(answers_are_valid(&request.answers));
}

#[test]
fn test_create_question_request_rejects_missing_answers() {
    let raw = r#"{ "title": "No answers", "theme_id": 1 }"#;
    assert!(serde_json::from_str::<CreateQuestionRequest>(raw).is_err());
}

#[test]
fn test_admin_profile_and_theme_shapes() {
    let profile = AdminProfile {
        id: 1,
        email: "admin@admin.com".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&profile).unwrap(),
        json!({ "id": 1, "email": "admin@admin.com" })
    );

    let theme = Theme {
        id: 3,
        title: "History".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&theme).unwrap(),
        json!({ "id": 3, "title": "History" })
    );
}

// --- Row assembly ---

#[test]
fn test_question_row_with_answers_keeps_order() {
    let row = QuestionRow {
        id: 4,
        title: "Order?".to_string(),
        theme_id: 9,
    };
    let answers = vec![
        Answer::new("first", false),
        Answer::new("second", true),
        Answer::new("third", false),
    ];

    let question = row.with_answers(answers.clone());

    assert_eq!(question.id, 4);
    assert_eq!(question.theme_id, 9);
    assert_eq!(question.answers, answers);
}
