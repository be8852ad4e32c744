//! Full user journey against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every controller
//! flow over real HTTP with `UreqTransport`, persisting credentials to a
//! temporary file.

use social_core::{
    ClientConfig, Controller, FeedView, FileStorage, FlowError, FormMode, LoginForm, Navigation, PageCursor, PostForm,
    RegisterForm, UreqTransport, ValidationError,
};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn feed_lifecycle() {
    let base_url = start_server();
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("credentials.json");
    let config = ClientConfig {
        base_url,
        page_limit: 2,
        storage_path: store_path.clone(),
        ..ClientConfig::default()
    };
    let mut controller = Controller::new(&config, UreqTransport::new(), FileStorage::new(&config.storage_path));
    let mut feed = FeedView::new();

    // Step 1: nothing works before login.
    let err = controller.load_page(&mut feed, PageCursor::first()).unwrap_err();
    assert!(matches!(err, FlowError::MissingCredentials));

    // Step 2: invalid registration never reaches the server.
    let mut register = RegisterForm {
        name: "bad name!".to_string(),
        email: "kari@stud.noroff.no".to_string(),
        password: "password1".to_string(),
    };
    let err = controller.register(&register).unwrap_err();
    assert!(matches!(err, FlowError::Validation(ValidationError::NameCharset)));

    // Step 3: register and log in.
    register.name = "kari".to_string();
    assert_eq!(controller.register(&register).unwrap(), Navigation::Login);

    let wrong = LoginForm {
        email: "kari@stud.noroff.no".to_string(),
        password: "wrongpass".to_string(),
    };
    let err = controller.login(&wrong).unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(!store_path.exists());

    let login = LoginForm {
        email: "kari@stud.noroff.no".to_string(),
        password: "password1".to_string(),
    };
    assert_eq!(controller.login(&login).unwrap(), Navigation::Feed);
    assert!(controller.store().credentials().unwrap().is_some());

    // Step 4: empty feed.
    let cursor = controller.load_page(&mut feed, PageCursor::first()).unwrap();
    assert!(feed.cards.is_empty());
    assert!(cursor.is_last_page());
    assert!(feed.load_more_disabled);

    // Step 5: create three posts; each submit reloads page 1.
    let mut form = PostForm::new();
    for (title, location) in [("First", "Oslo"), ("Second", ""), ("Third", "Bergen")] {
        form.title = title.to_string();
        form.body = format!("{title} body");
        form.location = location.to_string();
        controller.submit_post(&mut form, &mut feed).unwrap();
        assert_eq!(form, PostForm::default());
    }
    assert_eq!(feed.cards.len(), 2);
    assert_eq!(feed.cards[0].title, "Third");
    assert_eq!(feed.cards[1].location, "Unknown");
    assert_eq!(feed.cards[1].image_url, social_core::view::PLACEHOLDER_IMAGE);
    assert!(!feed.load_more_disabled);

    // Step 6: load more appends the last post and disables the control.
    let cursor = controller.load_page(&mut feed, PageCursor::first()).unwrap();
    let cursor = controller.load_more(&mut feed, cursor).unwrap();
    assert_eq!(cursor.page(), 2);
    assert_eq!(feed.cards.len(), 3);
    assert_eq!(feed.cards[2].title, "First");
    assert_eq!(feed.cards[2].location, "Oslo");
    assert!(feed.load_more_disabled);

    // Step 7: edit the first post.
    let first_id = feed.cards[2].id;
    let post = controller.fetch_post(first_id).unwrap();
    form.begin_edit(&post);
    assert_eq!(form.mode, FormMode::Edit { id: first_id });
    form.title = "First, edited".to_string();
    form.media_url = "https://img.example/fjord.jpg".to_string();
    controller.submit_post(&mut form, &mut feed).unwrap();
    assert_eq!(form.mode, FormMode::Create);

    let detail = controller.load_detail(first_id).unwrap();
    assert_eq!(detail.title, "First, edited");
    assert_eq!(detail.document_title, "First, edited | Feed");
    assert_eq!(detail.image_url, "https://img.example/fjord.jpg");
    assert_eq!(detail.author, "kari");
    assert_eq!(detail.location, "Oslo");

    // Step 8: delete it; page 1 is reloaded without it.
    controller.delete_post(first_id, &mut feed).unwrap();
    assert!(feed.cards.iter().all(|c| c.id != first_id));
    assert_eq!(feed.cards.len(), 2);

    let err = controller.load_detail(first_id).unwrap_err();
    assert!(matches!(err, FlowError::Api(social_core::ApiError::Request { status: 404, .. })));

    // Step 9: logout clears the file-backed credentials.
    assert_eq!(controller.logout(), Navigation::Login);
    let reopened = social_core::CredentialStore::new(FileStorage::new(&store_path));
    assert_eq!(reopened.token().unwrap(), None);
    assert_eq!(reopened.api_key().unwrap(), None);

    let err = controller.load_page(&mut feed, PageCursor::first()).unwrap_err();
    assert!(matches!(err, FlowError::MissingCredentials));
}
