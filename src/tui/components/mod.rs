//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: status line with notices and the "↓ New" indicator
//! - `Message`: one transcript entry
//! - `LandingPage`: greeting shown before the first message
//! - `HistorySidebar`: previews of sent messages
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: text input with attachment and microphone indicators
//! - `MessageList`: scrollable transcript with layout caching
//!
//! Components receive external data as props, never by reaching into `App`:
//!
//! ```rust,ignore
//! TitleBar::new(&app.status_message, app.notice.as_deref(), has_new, recording)
//!     .render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status bar)
//! ├── landing.rs       (greeting)
//! ├── history.rs       (sidebar)
//! ├── message.rs       (single entry renderer)
//! ├── message_list.rs  (scrollable transcript)
//! └── input_box/       (text input)
//! ```

pub mod history;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
mod title_bar;

pub use history::HistorySidebar;
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
