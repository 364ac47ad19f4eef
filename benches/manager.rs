use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use room_panels::{
    Command, Decor, FrameKind, Key, Layers, Log, Manager, ManagerConfig, Menu, MenuOption, Pad,
    Padding, Panel, PanelLayout, Payload, Rect, ScriptedTerminal, Size, Splash,
};
use room_panels::manager::DispatchTable;

const SCREEN: Size = Size::new(120, 40);

fn manager() -> Manager {
    let (term, _handle) = ScriptedTerminal::new(SCREEN);
    let config = ManagerConfig::default().with_poll_interval(Duration::ZERO);
    Manager::new(None, DispatchTable::new(), Box::new(term), config).expect("manager")
}

fn menu(len: usize) -> Menu {
    let options = (0..len).map(|i| MenuOption::new(format!("option {i}"))).collect();
    Menu::new(options)
        .and_then(|menu| menu.with_decor(Decor::framed(FrameKind::Heavy)))
        .expect("menu")
}

fn layers_solve(c: &mut Criterion) {
    let layout = PanelLayout::new()
        .with_origin(2, 4)
        .with_frame(true)
        .with_padding(Padding::symmetric(Pad::Fraction(0.1), Pad::Cells(2)))
        .and_then(|layout| layout.with_relative_width(0.75))
        .expect("layout");
    c.bench_function("layers_solve", |b| {
        b.iter(|| Layers::solve(black_box(&layout), black_box(Rect::new(0, 0, 120, 40))));
    });
}

fn menu_scroll_render(c: &mut Criterion) {
    c.bench_function("menu_scroll_render", |b| {
        let mut panel = menu(500);
        panel.resize(SCREEN.to_rect());
        b.iter(|| {
            panel.handle_key(Key::PageDown).expect("key");
            black_box(panel.render());
        });
    });
}

fn manager_command_script(c: &mut Criterion) {
    c.bench_function("manager_command_script", |b| {
        b.iter(|| {
            let mut manager = manager();
            manager.step(Some(Command::store("menu", menu(50))));
            manager.step(Some(Command::store("log", Log::new())));
            manager.step(Some(Command::store("splash", Splash::new("loading"))));
            manager.step(Some(Command::show("splash")));
            manager.step(Some(Command::show("log")));
            for i in 0..50 {
                manager.step(Some(Command::data("log", Payload::Line(format!("line {i}")))));
            }
            manager.step(Some(Command::show("menu")));
            manager.step(Some(Command::dismiss("menu")));
            manager.step(Some(Command::end("done")));
            black_box(manager.drain_responses().count())
        });
    });
}

criterion_group!(
    benches,
    layers_solve,
    menu_scroll_render,
    manager_command_script
);
criterion_main!(benches);
