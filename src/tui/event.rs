use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

pub enum Event {
    Input(KeyEvent),
    Resize,
    Tick,
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    _tx: mpsc::Sender<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            Self::event_loop(tx, tick_rate);
        });

        EventHandler { rx, _tx }
    }

    /// 事件循环处理函数，接收端关闭或终端读取失败时退出
    fn event_loop(tx: mpsc::Sender<Event>, tick_rate: Duration) {
        let mut last_tick = Instant::now();

        loop {
            let timeout = Self::calculate_timeout(tick_rate, last_tick);

            // 处理终端事件
            match Self::read_terminal_event(timeout) {
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Stopped reading terminal events: {}", e);
                    return;
                }
            }

            // 处理定时器事件
            if last_tick.elapsed() >= tick_rate {
                if tx.send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    }

    /// 计算超时时间
    fn calculate_timeout(tick_rate: Duration, last_tick: Instant) -> Duration {
        tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0))
    }

    /// 轮询并读取一个终端事件，只转发按下的按键与窗口大小变化
    fn read_terminal_event(timeout: Duration) -> std::io::Result<Option<Event>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let event = match event::read()? {
            // 部分平台同时上报按下与松开，只取按下，避免一次按键触发两次
            CEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Input(key)),
            CEvent::Resize(_, _) => Some(Event::Resize),
            _ => None,
        };
        Ok(event)
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
