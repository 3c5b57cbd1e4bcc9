use std::fs;
use std::io::Cursor;
use tempfile::TempDir;
use userlogin::auth::AuthManager;
use userlogin::console::Console;
use userlogin::repository::UserRepository;

fn run_script(dir: &TempDir, auto_login: bool, script: &str) -> String {
    let repo = UserRepository::new(dir.path().join("users.txt"));
    let auth = AuthManager::new(repo, auto_login);
    let mut console = Console::new(auth, Cursor::new(script.as_bytes().to_vec()), Vec::new());
    console.run().expect("Console run failed");

    let (auth, output) = console.into_parts();
    assert!(!auth.is_logged_in(), "session must end with the console");
    String::from_utf8(output).expect("Console output is not UTF-8")
}

fn store_content(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("users.txt")).unwrap_or_default()
}

#[test]
fn test_register_then_logout_and_exit() {
    let dir = tempfile::tempdir().unwrap();
    let script = "2\n\
                  a@b.co\n\
                  alice\n\
                  Abcdef1!\n\
                  Abcdef1!\n\
                  5\n\
                  3\n";

    let output = run_script(&dir, true, script);

    assert!(output.contains("Registration successful!"));
    assert!(output.contains("Welcome, alice"));
    assert!(output.contains("Logged out successfully!"));
    assert!(output.contains("Goodbye!"));
    assert!(store_content(&dir).starts_with("1,a@b.co,alice,Abcdef1!,"));
}

#[test]
fn test_register_reprompts_invalid_fields() {
    let dir = tempfile::tempdir().unwrap();
    let script = "2\n\
                  not-an-email\n\
                  a@b.co\n\
                  9lives\n\
                  alice\n\
                  weakpass\n\
                  Abcdef1!\n\
                  Abcdef1!\n\
                  3\n";

    let output = run_script(&dir, false, script);

    assert!(output.contains("Invalid email."));
    assert!(output.contains("Invalid username."));
    assert!(output.contains("Invalid password."));
    assert!(output.contains("You can now login."));
    assert_eq!(store_content(&dir).lines().count(), 1);
}

#[test]
fn test_password_confirmation_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let script = "2\na@b.co\nalice\nAbcdef1!\nAbcdef1?\n3\n";

    let output = run_script(&dir, true, script);

    assert!(output.contains("Passwords do not match!"));
    assert!(store_content(&dir).is_empty());
}

#[test]
fn test_login_display_and_bad_credentials() {
    let dir = tempfile::tempdir().unwrap();
    run_script(&dir, false, "2\na@b.co\nalice\nAbcdef1!\nAbcdef1!\n3\n");

    let script = "1\n\
                  alice\n\
                  wrong\n\
                  1\n\
                  alice\n\
                  Abcdef1!\n\
                  1\n\
                  5\n\
                  3\n";
    let output = run_script(&dir, false, script);

    assert!(output.contains("Invalid username or password."));
    assert!(output.contains("Login successful!"));
    assert!(output.contains("Username:        alice"));
    assert!(output.contains("******** (hidden)"));
    assert!(!output.contains("Abcdef1!"));
}

#[test]
fn test_edit_change_password_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let script = "2\n\
                  a@b.co\n\
                  alice\n\
                  Abcdef1!\n\
                  Abcdef1!\n\
                  2\n\
                  1\n\
                  alice@new.org\n\
                  3\n\
                  Abcdef1!\n\
                  Xyzabc2#\n\
                  Xyzabc2#\n\
                  4\n\
                  n\n\
                  5\n\
                  3\n";

    let output = run_script(&dir, true, script);

    assert!(output.contains("Information updated successfully!"));
    assert!(output.contains("Password changed successfully!"));
    assert!(store_content(&dir).starts_with("1,alice@new.org,alice,Xyzabc2#,"));

    let output = run_script(&dir, false, "1\nalice\nXyzabc2#\n4\ny\n3\n");
    assert!(output.contains("Account deleted successfully."));
    assert!(store_content(&dir).is_empty());
}

#[test]
fn test_duplicate_email_at_registration() {
    let dir = tempfile::tempdir().unwrap();
    run_script(&dir, false, "2\na@b.co\nalice\nAbcdef1!\nAbcdef1!\n3\n");

    let output = run_script(&dir, false, "2\na@b.co\n3\n");
    assert!(output.contains("Email already registered."));
    assert_eq!(store_content(&dir).lines().count(), 1);
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_script(&dir, true, "2\na@b.co\nalice\n");
    assert!(output.contains("Goodbye!"));
    assert!(store_content(&dir).is_empty());
}
