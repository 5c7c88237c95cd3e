use libris::db;
use libris::domain::{BookRepository, DomainError};
use libris::infrastructure::{AppState, SeaOrmBookRepository};
use libris::models::{Book, BookStatus};
use libris::services::{AddBookRequest, RegisterRequest};

async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

async fn register_patron(state: &AppState, name: &str, email: &str) {
    state
        .patrons
        .register(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
        })
        .await
        .expect("register failed");
}

async fn add_book(state: &AppState, title: &str, isbn: &str) -> Book {
    state
        .catalog
        .add_book(AddBookRequest {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            isbn: isbn.to_string(),
            status: None,
        })
        .await
        .expect("add_book failed")
}

#[tokio::test]
async fn checkout_and_return_round_trip() {
    let state = setup_test_state().await;
    register_patron(&state, "Jane Doe", "jane@x.com").await;
    let book = add_book(&state, "Harry Potter", "0-7475-3269-9").await;

    let loan = state
        .lending
        .check_out(&book.id, "jane@x.com")
        .await
        .expect("checkout failed");

    assert_eq!(loan.status, BookStatus::Borrowed);
    assert_eq!(loan.patron_email, "jane@x.com");
    assert!(loan.return_date.is_none());

    let borrowed = state.catalog.get_book(&book.id).await.unwrap();
    assert_eq!(borrowed.status, BookStatus::Borrowed);

    let returned = state
        .lending
        .return_book(&book.id, "jane@x.com")
        .await
        .expect("return failed");

    assert_eq!(returned.status, BookStatus::Available);
    let return_date = returned.return_date.expect("return date not set");
    let age = chrono::Utc::now() - return_date;
    assert!(age.num_seconds().abs() < 1, "return date not recent: {}", return_date);

    let available = state.catalog.get_book(&book.id).await.unwrap();
    assert_eq!(available.status, BookStatus::Available);

    // A second return finds no active loan
    let err = state
        .lending
        .return_book(&book.id, "jane@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn checkout_of_borrowed_book_is_a_conflict() {
    let state = setup_test_state().await;
    register_patron(&state, "Jane Doe", "jane@x.com").await;
    register_patron(&state, "John Smith", "john@x.com").await;
    let book = add_book(&state, "Dune", "0-441-17271-7").await;

    state.lending.check_out(&book.id, "jane@x.com").await.unwrap();

    let err = state
        .lending
        .check_out(&book.id, "john@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "got {:?}", err);

    // Status unchanged, and no loan appeared for the second patron
    let book_after = state.catalog.get_book(&book.id).await.unwrap();
    assert_eq!(book_after.status, BookStatus::Borrowed);

    let err = state
        .lending
        .return_book(&book.id, "john@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn double_checkout_by_same_patron_is_a_conflict() {
    let state = setup_test_state().await;
    register_patron(&state, "Jane Doe", "jane@x.com").await;
    let book = add_book(&state, "Dune", "0-441-17271-7").await;

    state.lending.check_out(&book.id, "jane@x.com").await.unwrap();

    let err = state
        .lending
        .check_out(&book.id, "jane@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn reserved_book_cannot_be_checked_out() {
    let state = setup_test_state().await;
    register_patron(&state, "Jane Doe", "jane@x.com").await;
    register_patron(&state, "John Smith", "john@x.com").await;
    let book = add_book(&state, "Dune", "0-441-17271-7").await;

    let reservation = state
        .lending
        .reserve_book(&book.id, "jane@x.com")
        .await
        .expect("reserve failed");
    assert_eq!(reservation.status, BookStatus::Reserved);

    let err = state
        .lending
        .check_out(&book.id, "john@x.com")
        .await
        .unwrap_err();
    match err {
        DomainError::Conflict(msg) => assert!(msg.contains("reserved"), "message: {}", msg),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn patron_identification_is_case_insensitive() {
    let state = setup_test_state().await;
    register_patron(&state, "Jane Doe", "  Jane@X.Com ").await;
    let book = add_book(&state, "Dune", "0-441-17271-7").await;

    let loan = state
        .lending
        .check_out(&book.id, "JANE@x.COM")
        .await
        .expect("checkout with differently-cased email failed");
    assert_eq!(loan.patron_email, "jane@x.com");

    state
        .lending
        .return_book(&book.id, "jane@X.com")
        .await
        .expect("return with differently-cased email failed");
}

#[tokio::test]
async fn unknown_patron_and_bad_identifier() {
    let state = setup_test_state().await;
    let book = add_book(&state, "Dune", "0-441-17271-7").await;

    let err = state
        .lending
        .check_out(&book.id, "ghost@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let err = state
        .lending
        .check_out(&book.id, "not an email")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn checkout_of_missing_book_is_not_found() {
    let state = setup_test_state().await;
    register_patron(&state, "Jane Doe", "jane@x.com").await;

    let err = state
        .lending
        .check_out("no-such-id", "jane@x.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let state = setup_test_state().await;
    register_patron(&state, "Jane Doe", "jane@x.com").await;

    let err = state
        .patrons
        .register(RegisterRequest {
            name: "Jane Doe".to_string(),
            email: "JANE@X.COM".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

// The conditional status write is the guard against two checkouts both
// passing the availability check: the one whose observed status is stale
// must not flip the book.
#[tokio::test]
async fn stale_status_swap_is_rejected() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let repo = SeaOrmBookRepository::new(db.clone());
    let state = AppState::new(db);

    let book = add_book(&state, "Dune", "0-441-17271-7").await;

    // Stale observation: claims the book is borrowed when it is available
    let swapped = repo
        .update_status(&book.id, BookStatus::Borrowed, BookStatus::Available)
        .await
        .unwrap();
    assert!(!swapped);

    // Fresh observation succeeds exactly once
    let swapped = repo
        .update_status(&book.id, BookStatus::Available, BookStatus::Borrowed)
        .await
        .unwrap();
    assert!(swapped);

    let swapped = repo
        .update_status(&book.id, BookStatus::Available, BookStatus::Borrowed)
        .await
        .unwrap();
    assert!(!swapped, "second swap saw a stale status and must fail");

    let book_after = state.catalog.get_book(&book.id).await.unwrap();
    assert_eq!(book_after.status, BookStatus::Borrowed);
}
