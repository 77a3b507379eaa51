/// Vector outline in local (particle) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    CubicTo {
        c1: (f32, f32),
        c2: (f32, f32),
        to: (f32, f32),
    },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(x, y));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(x, y));
        self
    }

    pub fn cubic_to(&mut self, c1: (f32, f32), c2: (f32, f32), to: (f32, f32)) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { c1, c2, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Split into closed polygons, sampling each cubic with `steps` segments.
    pub fn flatten(&self, steps: usize) -> Vec<Vec<(f32, f32)>> {
        let steps = steps.max(1);
        let mut polygons = Vec::new();
        let mut current: Vec<(f32, f32)> = Vec::new();

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => {
                    if current.len() > 1 {
                        polygons.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push((x, y));
                }
                PathCommand::LineTo(x, y) => current.push((x, y)),
                PathCommand::CubicTo { c1, c2, to } => {
                    let from = current.last().copied().unwrap_or((0.0, 0.0));
                    if current.is_empty() {
                        current.push(from);
                    }
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        current.push(cubic_point(from, c1, c2, to, t));
                    }
                }
                PathCommand::Close => {
                    if current.len() > 1 {
                        polygons.push(std::mem::take(&mut current));
                    }
                }
            }
        }

        if current.len() > 1 {
            polygons.push(current);
        }
        polygons
    }
}

fn cubic_point(p0: (f32, f32), p1: (f32, f32), p2: (f32, f32), p3: (f32, f32), t: f32) -> (f32, f32) {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_lines_and_curves() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .cubic_to((10.0, 5.0), (5.0, 10.0), (0.0, 10.0))
            .close();
        assert_eq!(path.commands().len(), 4);
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));

        let polygons = path.flatten(4);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 2 + 4);
        assert_eq!(polygons[0].last(), Some(&(0.0, 10.0)));
    }

    #[test]
    fn separate_subpaths() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(1.0, 0.0).line_to(1.0, 1.0).close();
        path.move_to(5.0, 5.0).line_to(6.0, 5.0).line_to(6.0, 6.0);
        assert_eq!(path.flatten(8).len(), 2);
    }
}
