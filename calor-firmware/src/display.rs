//! SSD1306 screen layouts
//!
//! Draws core view descriptors into any monochrome `DrawTarget`. The
//! caller clears the frame buffer before and flushes it after.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;

use calor_core::view::{MainView, SettingsView, ViewRenderer};
use calor_core::MemorySlot;

/// Power meter segments, top segment lit only near full power
const POWER_SEGMENTS: u32 = 8;

const SCREEN_CENTER_X: i32 = 64;

const SMALL: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
const LARGE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(&FONT_10X20, BinaryColor::On);

/// Renders views onto a borrowed frame buffer
pub struct Screen<'a, D> {
    target: &'a mut D,
}

impl<'a, D> Screen<'a, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self { target }
    }

    fn text(
        &mut self,
        text: &str,
        position: Point,
        style: MonoTextStyle<'static, BinaryColor>,
        alignment: Alignment,
    ) -> Result<(), D::Error> {
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();
        Text::with_text_style(text, position, style, text_style).draw(self.target)?;
        Ok(())
    }

    /// White rounded box with black text, used for titles and preset tags
    fn boxed(&mut self, text: &str, area: Rectangle) -> Result<(), D::Error> {
        RoundedRectangle::with_equal_corners(area, Size::new(2, 2))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(self.target)?;

        let inverted = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::Off)
            .build();
        let center = Point::new(area.center().x, area.top_left.y + 1);
        self.text(text, center, inverted, Alignment::Center)
    }

    fn power_meter(&mut self, actuator_percent: f32) -> Result<(), D::Error> {
        let lit = (actuator_percent.clamp(0.0, 100.0) * POWER_SEGMENTS as f32 / 100.0) as u32;

        for segment in 0..lit.min(POWER_SEGMENTS) {
            // Bottom segment is the narrowest
            let y = 56 - segment as i32 * 8;
            let width = 10 + segment;
            Rectangle::new(Point::new(127 - width as i32, y), Size::new(width, 6))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(self.target)?;
        }
        Ok(())
    }

    fn slot_tag(&mut self, slot: MemorySlot) -> Result<(), D::Error> {
        let mut label: String<2> = String::new();
        let _ = write!(label, "M{}", slot.number());

        let x = slot.index() as i32 * 22;
        self.boxed(&label, Rectangle::new(Point::new(x, 50), Size::new(20, 12)))
    }
}

impl<D> ViewRenderer for Screen<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    type Error = D::Error;

    fn draw_logo(&mut self) -> Result<(), Self::Error> {
        Rectangle::new(Point::new(0, 0), Size::new(128, 64))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self.target)?;
        self.text("CALOR", Point::new(SCREEN_CENTER_X, 16), LARGE, Alignment::Center)?;
        self.text(
            "soldering station",
            Point::new(SCREEN_CENTER_X, 40),
            SMALL,
            Alignment::Center,
        )
    }

    fn draw_main(&mut self, view: &MainView) -> Result<(), Self::Error> {
        let mut setpoint: String<8> = String::new();
        let _ = write!(setpoint, "{}", view.setpoint as i32);
        self.text(&setpoint, Point::new(0, 18), LARGE, Alignment::Left)?;

        let degree_x = setpoint.len() as i32 * 10 + 3;
        Circle::new(Point::new(degree_x, 19), 4)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self.target)?;
        self.text("C", Point::new(degree_x + 6, 24), SMALL, Alignment::Left)?;

        if let Some(pending) = view.pending_slot {
            self.text("SELECT MEM", Point::new(0, 0), SMALL, Alignment::Left)?;
            if view.blink_on {
                self.slot_tag(pending)?;
            }
            return Ok(());
        }

        if view.sensor_fault {
            self.text("SENSOR ERR", Point::new(0, 0), SMALL, Alignment::Left)?;
        } else {
            let mut measured: String<8> = String::new();
            let _ = write!(measured, "{}", (view.measured + 0.5) as i32);
            self.text(&measured, Point::new(0, 0), SMALL, Alignment::Left)?;
        }

        if view.standby {
            self.text("STANDBY", Point::new(64, 0), SMALL, Alignment::Left)?;
        }

        self.power_meter(view.actuator_percent)?;

        if let Some(active) = view.active_slot {
            self.slot_tag(active)?;
        }
        Ok(())
    }

    fn draw_settings(&mut self, view: &SettingsView) -> Result<(), Self::Error> {
        self.boxed(view.title, Rectangle::new(Point::new(0, 0), Size::new(128, 12)))?;

        if view.value_visible() {
            self.text(&view.value, Point::new(SCREEN_CENTER_X, 20), LARGE, Alignment::Center)?;
        }
        self.text(view.unit, Point::new(SCREEN_CENTER_X, 46), SMALL, Alignment::Center)
    }
}
