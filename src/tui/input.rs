use crate::models::KeybindingsConfig;
use crossterm::event::{KeyCode, KeyEvent};

/// 输入处理器，负责将按键事件映射到应用操作
pub struct InputHandler {
    keybindings: KeybindingsConfig,
}

/// 用户操作类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserAction {
    Quit,
    MoveUp,
    MoveDown,
    Toggle,
    Edit,
    SelectAll,
    Reload,
    ReloadAll,
    ScrollPageUp,
    ScrollPageDown,
    // ————————————————————————————————————————————————————————————————————————
    // 编辑结果目录时使用的操作
    // ————————————————————————————————————————————————————————————————————————
    InputChar(char),
    Backspace,
    Submit,
    Cancel,
    None,
}

impl InputHandler {
    pub fn new(keybindings: KeybindingsConfig) -> Self {
        Self { keybindings }
    }

    /// 处理按键事件，返回对应的用户操作
    pub fn handle_key_event(&self, key_event: KeyEvent) -> UserAction {
        match key_event.code {
            KeyCode::Char(c) => self.handle_char_key(c),
            KeyCode::Up => UserAction::MoveUp,
            KeyCode::Down => UserAction::MoveDown,
            KeyCode::PageUp => UserAction::ScrollPageUp,
            KeyCode::PageDown => UserAction::ScrollPageDown,
            KeyCode::Enter => UserAction::Toggle,
            KeyCode::Esc => UserAction::Quit,
            _ => UserAction::None,
        }
    }

    /// 编辑文本框时的按键处理：字符直接输入
    pub fn handle_editing_key_event(&self, key_event: KeyEvent) -> UserAction {
        match key_event.code {
            KeyCode::Char(c) => UserAction::InputChar(c),
            KeyCode::Backspace => UserAction::Backspace,
            KeyCode::Enter => UserAction::Submit,
            KeyCode::Esc => UserAction::Cancel,
            _ => UserAction::None,
        }
    }

    /// 处理字符按键
    fn handle_char_key(&self, c: char) -> UserAction {
        let key_str = if c == ' ' { "space".to_string() } else { c.to_string() };

        // 构建操作映射表
        let action_map = self.build_action_map();

        // 查找匹配的操作
        self.find_matching_action(&key_str, &action_map)
    }

    /// 构建操作映射表
    fn build_action_map(&self) -> [(&str, UserAction); 10] {
        [
            (&self.keybindings.quit, UserAction::Quit),
            (&self.keybindings.up, UserAction::MoveUp),
            (&self.keybindings.down, UserAction::MoveDown),
            (&self.keybindings.toggle, UserAction::Toggle),
            (&self.keybindings.edit, UserAction::Edit),
            (&self.keybindings.select_all, UserAction::SelectAll),
            (&self.keybindings.reload, UserAction::Reload),
            (&self.keybindings.reload_all, UserAction::ReloadAll),
            (&self.keybindings.scroll_up, UserAction::ScrollPageUp),
            (&self.keybindings.scroll_down, UserAction::ScrollPageDown),
        ]
    }

    /// 查找匹配的操作
    fn find_matching_action(&self, key_str: &str, action_map: &[(&str, UserAction)]) -> UserAction {
        for (key, action) in action_map {
            if key_str == *key {
                return *action;
            }
        }
        UserAction::None
    }
}
