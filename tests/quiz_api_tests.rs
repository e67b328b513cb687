// tests/quiz_api_tests.rs

mod common;

use common::{sample_quiz_json, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn list_is_empty_on_fresh_database() {
    let app = spawn_app().await;
    let token = app.token().await;

    let response = app
        .client
        .get(app.url("/quizzes"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let quizzes: Vec<Value> = response.json().await.unwrap();
    assert!(quizzes.is_empty());
}

#[tokio::test]
async fn create_returns_created_quiz_with_location() {
    let app = spawn_app().await;
    let token = app.token().await;

    let response = app.create_quiz(&token, &sample_quiz_json()).await;

    assert_eq!(response.status().as_u16(), 201);
    let location = response
        .headers()
        .get("location")
        .expect("Location header missing")
        .to_str()
        .unwrap()
        .to_string();
    let created: Value = response.json().await.unwrap();
    let id = created["quizId"].as_i64().unwrap();

    assert!(id > 0);
    assert_eq!(location, format!("/quizzes/{}", id));
    for question in created["questions"].as_array().unwrap() {
        assert!(question["questionId"].as_i64().unwrap() > 0);
        for option in question["options"].as_array().unwrap() {
            assert!(option["optionId"].as_i64().unwrap() > 0);
        }
    }
    // Omitted points default to 1.
    assert_eq!(created["questions"][2]["points"], 1);
}

#[tokio::test]
async fn get_returns_full_answer_key_in_order() {
    let app = spawn_app().await;
    let token = app.token().await;
    let created: Value = app
        .create_quiz(&token, &sample_quiz_json())
        .await
        .json()
        .await
        .unwrap();
    let id = created["quizId"].as_i64().unwrap();

    let response = app.get_quiz(&token, id).await;

    assert_eq!(response.status().as_u16(), 200);
    let quiz: Value = response.json().await.unwrap();
    assert_eq!(quiz, created);
    assert_eq!(quiz["title"], "General Knowledge");

    let types: Vec<i64> = quiz["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["type"].as_i64().unwrap())
        .collect();
    assert_eq!(types, vec![0, 1, 2]);

    let first_options: Vec<(&str, bool)> = quiz["questions"][0]["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| (o["text"].as_str().unwrap(), o["isCorrect"].as_bool().unwrap()))
        .collect();
    assert_eq!(
        first_options,
        vec![
            ("Berlin", false),
            ("Madrid", false),
            ("Paris", true),
            ("Rome", false)
        ]
    );
}

#[tokio::test]
async fn get_unknown_quiz_is_404() {
    let app = spawn_app().await;
    let token = app.token().await;

    let response = app.get_quiz(&token, 9999).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = spawn_app().await;
    let token = app.token().await;

    let response = app
        .client
        .get(app.url("/quizzes/abc"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn list_shows_summaries_with_question_count() {
    let app = spawn_app().await;
    let token = app.token().await;
    app.create_quiz(&token, &sample_quiz_json()).await;
    app.create_quiz(
        &token,
        &json!({ "title": "Empty quiz", "description": "", "questions": [] }),
    )
    .await;

    let quizzes: Vec<Value> = app
        .client
        .get(app.url("/quizzes"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[0]["title"], "General Knowledge");
    assert_eq!(quizzes[0]["questionCount"], 3);
    assert_eq!(quizzes[1]["questionCount"], 0);
    assert!(quizzes[0].get("questions").is_none());
}

#[tokio::test]
async fn create_validates_before_writing() {
    let app = spawn_app().await;
    let token = app.token().await;

    let too_short = json!({ "title": "ab", "questions": [] });
    let too_long_title = json!({ "title": "x".repeat(101), "questions": [] });
    let too_long_description =
        json!({ "title": "Fine title", "description": "d".repeat(501), "questions": [] });
    let unknown_type = json!({
        "title": "Fine title",
        "questions": [ { "text": "Q", "type": 7, "options": [] } ]
    });
    let zero_points = json!({
        "title": "Fine title",
        "questions": [ { "text": "Q", "type": 2, "points": 0, "options": [ { "text": "a" } ] } ]
    });

    for body in [too_short, too_long_title, too_long_description, unknown_type, zero_points] {
        let response = app.create_quiz(&token, &body).await;
        assert_eq!(response.status().as_u16(), 400, "body {} should be rejected", body);
    }

    assert_eq!(app.quiz_count().await, 0);
}

#[tokio::test]
async fn title_length_bounds_are_inclusive() {
    let app = spawn_app().await;
    let token = app.token().await;

    let shortest = app
        .create_quiz(&token, &json!({ "title": "abc" }))
        .await;
    let longest = app
        .create_quiz(
            &token,
            &json!({ "title": "t".repeat(100), "description": "d".repeat(500) }),
        )
        .await;

    assert_eq!(shortest.status().as_u16(), 201);
    assert_eq!(longest.status().as_u16(), 201);
}

#[tokio::test]
async fn points_are_capped() {
    let app = spawn_app().await;
    let token = app.token().await;
    let with_points = |points: i64| {
        json!({
            "title": "Weighted",
            "questions": [
                { "text": "Q", "type": 2, "points": points, "options": [ { "text": "a", "isCorrect": true } ] }
            ]
        })
    };

    let too_many = app.create_quiz(&token, &with_points(1001)).await;
    let overflowing = app.create_quiz(&token, &with_points(i64::from(i32::MAX))).await;
    let at_cap = app.create_quiz(&token, &with_points(1000)).await;

    assert_eq!(too_many.status().as_u16(), 400);
    assert_eq!(overflowing.status().as_u16(), 400);
    assert_eq!(at_cap.status().as_u16(), 201);
    assert_eq!(app.quiz_count().await, 1);
}

#[tokio::test]
async fn update_with_mismatched_id_is_400_and_leaves_quiz_untouched() {
    let app = spawn_app().await;
    let token = app.token().await;
    let created: Value = app
        .create_quiz(&token, &sample_quiz_json())
        .await
        .json()
        .await
        .unwrap();
    let id = created["quizId"].as_i64().unwrap();

    let mut payload = created.clone();
    payload["quizId"] = json!(id + 1);
    payload["title"] = json!("Hijacked");

    let response = app
        .client
        .put(app.url(&format!("/quizzes/{}", id)))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let stored: Value = app.get_quiz(&token, id).await.json().await.unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn update_unknown_quiz_is_404() {
    let app = spawn_app().await;
    let token = app.token().await;

    let mut payload = sample_quiz_json();
    payload["quizId"] = json!(42);

    let response = app
        .client
        .put(app.url("/quizzes/42"))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(app.quiz_count().await, 0);
}

#[tokio::test]
async fn update_replaces_the_question_tree() {
    let app = spawn_app().await;
    let token = app.token().await;
    let created: Value = app
        .create_quiz(&token, &sample_quiz_json())
        .await
        .json()
        .await
        .unwrap();
    let id = created["quizId"].as_i64().unwrap();
    let old_question_ids: Vec<i64> = created["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["questionId"].as_i64().unwrap())
        .collect();

    let replacement = json!({
        "quizId": id,
        "title": "Capitals",
        "description": "Only one question now",
        "questions": [
            {
                "questionId": old_question_ids[0],
                "text": "Capital of Italy?",
                "type": 0,
                "points": 3,
                "options": [
                    { "text": "Rome", "isCorrect": true },
                    { "text": "Milan", "isCorrect": false }
                ]
            }
        ]
    });

    let response = app
        .client
        .put(app.url(&format!("/quizzes/{}", id)))
        .bearer_auth(&token)
        .json(&replacement)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let stored: Value = app.get_quiz(&token, id).await.json().await.unwrap();
    assert_eq!(stored["title"], "Capitals");
    assert_eq!(stored["description"], "Only one question now");
    let questions = stored["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["points"], 3);
    assert_eq!(questions[0]["options"][0]["text"], "Rome");
    // Old questions are discarded, not reused.
    let new_id = questions[0]["questionId"].as_i64().unwrap();
    assert!(!old_question_ids.contains(&new_id));

    let orphaned: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM options o LEFT JOIN questions q ON o.question_id = q.id WHERE q.id IS NULL",
    )
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(orphaned, 0);
}

#[tokio::test]
async fn update_with_invalid_title_is_400() {
    let app = spawn_app().await;
    let token = app.token().await;
    let created: Value = app
        .create_quiz(&token, &sample_quiz_json())
        .await
        .json()
        .await
        .unwrap();
    let id = created["quizId"].as_i64().unwrap();

    let mut payload = created.clone();
    payload["title"] = json!("no");

    let response = app
        .client
        .put(app.url(&format!("/quizzes/{}", id)))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let stored: Value = app.get_quiz(&token, id).await.json().await.unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn delete_removes_quiz_and_its_subtree() {
    let app = spawn_app().await;
    let token = app.token().await;
    let created: Value = app
        .create_quiz(&token, &sample_quiz_json())
        .await
        .json()
        .await
        .unwrap();
    let id = created["quizId"].as_i64().unwrap();

    let response = app
        .client
        .delete(app.url(&format!("/quizzes/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 204);
    assert_eq!(app.get_quiz(&token, id).await.status().as_u16(), 404);

    let leftovers: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM questions) + (SELECT COUNT(*) FROM options)",
    )
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn delete_unknown_quiz_is_404() {
    let app = spawn_app().await;
    let token = app.token().await;

    let response = app
        .client
        .delete(app.url("/quizzes/12345"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn openapi_document_lists_quiz_routes() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api-docs/openapi.json"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let doc: Value = response.json().await.unwrap();
    assert!(doc["paths"].get("/quizzes").is_some());
    assert!(doc["paths"].get("/quizzes/{id}").is_some());
    assert!(doc["components"]["securitySchemes"].get("bearer_auth").is_some());
}
