//! The caregiver-facing form: context boxes for both children, the question
//! row, the transient notice, and the answer panel with its typing
//! indicator.

use client_core::SessionEvent;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Subject;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

pub struct AssistantApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    mia_context_draft: String,
    luna_context_draft: String,
    question_draft: String,
    answer_text: String,
    notice: String,
    is_awaiting_answer: bool,
    is_revealing: bool,
    status: String,
}

impl AssistantApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            mia_context_draft: String::new(),
            luna_context_draft: String::new(),
            question_draft: String::new(),
            answer_text: String::new(),
            notice: String::new(),
            is_awaiting_answer: false,
            is_revealing: false,
            status: "Backend worker starting...".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Session(SessionEvent::NoticeChanged { notice }) => self.notice = notice,
                UiEvent::Session(SessionEvent::AnswerTextChanged { answer }) => {
                    self.answer_text = answer;
                }
                UiEvent::Session(SessionEvent::PhaseChanged { awaiting, revealing }) => {
                    self.is_awaiting_answer = awaiting;
                    self.is_revealing = revealing;
                }
                UiEvent::Error(err) => {
                    self.status = match err.context() {
                        UiErrorContext::BackendStartup => {
                            format!("Startup error: {}", err.message())
                        }
                        UiErrorContext::General => format!("Error: {}", err.message()),
                    };
                }
            }
        }
    }

    fn can_submit_context(&self) -> bool {
        !self.is_awaiting_answer
            && has_submittable_context(&self.mia_context_draft, &self.luna_context_draft)
    }

    fn can_submit_question(&self) -> bool {
        !self.is_awaiting_answer && !self.question_draft.trim().is_empty()
    }

    fn submit_context(&mut self) {
        if !self.can_submit_context() {
            return;
        }
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::UpdateContext {
                mia_context: self.mia_context_draft.clone(),
                luna_context: self.luna_context_draft.clone(),
            },
            &mut self.status,
        );
    }

    fn submit_question(&mut self) {
        if !self.can_submit_question() {
            return;
        }
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::AskQuestion {
                question: self.question_draft.clone(),
            },
            &mut self.status,
        );
    }

    fn context_box(
        ui: &mut egui::Ui,
        subject: Subject,
        draft: &mut String,
        enabled: bool,
    ) {
        let name = subject.display_name();
        ui.label(egui::RichText::new(format!("Add Context for {name}")).strong());
        let edit = egui::TextEdit::multiline(draft)
            .hint_text(format!("e.g., {name}'s age, weight, recent symptoms..."))
            .desired_rows(4)
            .desired_width(f32::INFINITY);
        ui.add_enabled(enabled, edit);
    }
}

fn has_submittable_context(mia: &str, luna: &str) -> bool {
    !mia.trim().is_empty() || !luna.trim().is_empty()
}

impl eframe::App for AssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("AI Pediatrician");
                ui.weak("Ask me anything about Luna and Mia!");
            });
            ui.add_space(12.0);

            let inputs_enabled = !self.is_awaiting_answer;
            ui.columns(2, |columns| {
                Self::context_box(
                    &mut columns[0],
                    Subject::Mia,
                    &mut self.mia_context_draft,
                    inputs_enabled,
                );
                Self::context_box(
                    &mut columns[1],
                    Subject::Luna,
                    &mut self.luna_context_draft,
                    inputs_enabled,
                );
            });

            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                let update_btn = egui::Button::new("Update Context");
                if ui.add_enabled(self.can_submit_context(), update_btn).clicked() {
                    self.submit_context();
                }
            });

            if !self.notice.is_empty() {
                ui.add_space(6.0);
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(&self.notice).strong());
                });
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(12.0);

            let question_response = ui
                .horizontal(|ui| {
                    let edit = egui::TextEdit::singleline(&mut self.question_draft)
                        .hint_text(
                            "Ask me about your baby's development, feeding, sleep, or anything else...",
                        )
                        .desired_width(ui.available_width() - 110.0);
                    let response = ui.add_enabled(inputs_enabled, edit);

                    let ask_label = if self.is_awaiting_answer { "Thinking..." } else { "Ask Doctor" };
                    let ask_btn = egui::Button::new(ask_label);
                    if ui.add_enabled(self.can_submit_question(), ask_btn).clicked() {
                        self.submit_question();
                    }
                    response
                })
                .inner;

            let enter_pressed = ctx.input(|i| i.key_pressed(egui::Key::Enter));
            if question_response.lost_focus() && enter_pressed {
                self.submit_question();
            }

            if !self.answer_text.is_empty() {
                ui.add_space(12.0);
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new("AI Pediatrician says:").strong());
                    ui.add_space(4.0);
                    let mut rendered = self.answer_text.clone();
                    if self.is_revealing {
                        rendered.push('|');
                    }
                    ui.label(rendered);
                });
            }

            ui.add_space(12.0);
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        // Keep draining worker events while a reveal is animating.
        if self.is_revealing || self.is_awaiting_answer {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
