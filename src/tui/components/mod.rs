//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields, rebuilt each frame:
//! - `TitleBar`: Top status bar showing backend and status
//! - `MessageBubble`: One conversation message
//! - `LandingPage`: Empty-conversation welcome
//! - `StartupScreen`: Greeting and health status before the chat opens
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Prompt entry field
//! - `MessageList`: Scrollable conversation view with layout caching and
//!   per-message view state (edit buffers, copy feedback)
//! - `ErrorBoundary`: Swaps the conversation view for a fallback after a
//!   render error
//!
//! ### Display Helpers
//!
//! - `Typewriter`: Character-by-character reveal of AI replies
//! - `TextBuffer`: Cursor-aware text editing shared by input and edits
//!
//! Components receive external data as props, never by reaching into the
//! core `App`:
//!
//! ```rust,ignore
//! // Good: Dependencies are explicit
//! TitleBar::new(app.backend_label.clone(), app.status_message.clone(), unseen).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── boundary.rs      (ErrorBoundary + ViewError)
//! ├── input_box.rs     (Prompt entry)
//! ├── landing.rs       (Empty state)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── startup.rs       (Backend warm-up screen)
//! ├── text_buffer.rs   (Editable text + wrapping helpers)
//! ├── title_bar.rs     (Top status bar)
//! └── typewriter.rs    (Reveal animation)
//! ```

pub mod boundary;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod startup;
pub mod text_buffer;
mod title_bar;
pub mod typewriter;

pub use boundary::{ErrorBoundary, ViewError};
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
pub use startup::StartupScreen;
pub use title_bar::TitleBar;
pub use typewriter::Typewriter;
