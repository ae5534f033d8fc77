use crate::tui::{App, Event, EventHandler, InputHandler, InputMode, Renderer, UserAction};
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

/// TUI应用控制器，负责协调各个组件
pub struct TuiApp {
    app: App,
    input_handler: InputHandler,
    renderer: Renderer,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TuiApp {
    pub fn new(app: App) -> Result<Self> {
        // 设置终端
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let input_handler = InputHandler::new(app.config.keybindings.clone());
        let renderer = Renderer::new();

        Ok(Self {
            app,
            input_handler,
            renderer,
            terminal,
        })
    }

    /// 运行TUI应用主循环，退出时总是恢复终端
    pub fn run(&mut self) -> Result<()> {
        let result = self.main_loop();
        let cleanup = self.cleanup();
        result.and(cleanup)
    }

    /// 每个事件处理完后重新绘制整个界面
    fn main_loop(&mut self) -> Result<()> {
        // 创建事件处理器，使用配置中的刷新率
        let tick_rate = Duration::from_millis(self.app.config.tui.tick_rate_ms.max(10));
        let events = EventHandler::new(tick_rate);

        loop {
            // 渲染界面
            self.terminal.draw(|f| {
                self.renderer.draw(f, &mut self.app);
            })?;

            // 处理事件
            match events.next()? {
                Event::Input(key_event) => {
                    let action = match self.app.input_mode {
                        InputMode::Normal => self.input_handler.handle_key_event(key_event),
                        InputMode::EditingFolder => self.input_handler.handle_editing_key_event(key_event),
                    };
                    if action != UserAction::None {
                        self.app.handle_action(action);
                    }
                }
                Event::Resize | Event::Tick => {}
            }

            if self.app.should_quit {
                break;
            }
        }

        Ok(())
    }

    // 清理终端设置
    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
