//! Maze generation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{Connection, Direction, Maze, MazeError, Point, Room};

/// Room under construction: sides stay undecided until the walk
/// resolves them.
#[derive(Clone, Copy)]
struct Cell {
    connections: [Option<Connection>; 4],
    visited: bool,
}

/// Suspended exploration of one room: the shuffled direction order and
/// how far through it the walk has come.
struct Frame {
    cell: Point,
    directions: [Direction; 4],
    next: usize,
}

/// Maze generator for hex-encoded mazes.
///
/// Carves perfect mazes: the open connections form a spanning tree, so
/// any two rooms are joined by exactly one path.
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Generate a maze with the drunken walk algorithm
    ///
    /// Starting from the top-left room, walk into randomly chosen
    /// unvisited neighbors until every room has been seen, carving a
    /// passage along each first entry. A step against the maze border
    /// places a wall, and a step towards an already visited room copies
    /// that room's facing side, which keeps the two sides of every
    /// shared edge equal.
    ///
    /// Returns an error if either dimension is zero.
    pub fn generate(&mut self, num_rows: usize, num_cols: usize) -> Result<Maze, MazeError> {
        if num_rows == 0 || num_cols == 0 {
            return Err(MazeError::InvalidDimension { num_rows, num_cols });
        }

        let mut cells = vec![
            Cell {
                connections: [None; 4],
                visited: false,
            };
            num_rows * num_cols
        ];

        // The walk itself, with an explicit stack in place of recursion
        // so that large mazes cannot exhaust the call stack
        cells[0].visited = true;
        let mut stack = vec![self.frame(Point { row: 0, col: 0 })];
        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }
            let cell = frame.cell;
            let direction = frame.directions[frame.next];
            frame.next += 1;

            let index = cell.row * num_cols + cell.col;
            match direction.step(cell, num_rows, num_cols) {
                None => cells[index].connections[direction.index()] = Some(Connection::Wall),
                Some(neighbor) => {
                    let neighbor_index = neighbor.row * num_cols + neighbor.col;
                    if !cells[neighbor_index].visited {
                        cells[index].connections[direction.index()] = Some(Connection::Open);
                        cells[neighbor_index].visited = true;
                        stack.push(self.frame(neighbor));
                    } else {
                        // The edge was already decided from the other
                        // side; a side still undecided over there means
                        // the wall stands
                        let facing =
                            cells[neighbor_index].connections[direction.opposite().index()];
                        cells[index].connections[direction.index()] = Some(match facing {
                            Some(Connection::Open) => Connection::Open,
                            _ => Connection::Wall,
                        });
                    }
                }
            }
        }

        let rooms = cells
            .into_iter()
            .map(|cell| {
                Room::new(
                    cell.connections
                        .map(|side| side.expect("the walk resolves every side of every room")),
                )
            })
            .collect();
        Ok(Maze::new(num_rows, num_cols, rooms))
    }

    /// New exploration frame with a freshly shuffled direction order
    fn frame(&mut self, cell: Point) -> Frame {
        let mut directions = Direction::ALL;
        directions.shuffle(&mut self.random);
        Frame {
            cell,
            directions,
            next: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use petgraph::algo::connected_components;
    use petgraph::{Graph, Undirected};

    use crate::maze_generator::MazeGenerator;
    use crate::{Connection, Direction, Maze, MazeError, Point, SolveMode};

    #[test]
    fn zero_dimension_is_rejected() {
        let mut generator = MazeGenerator::new(Some(0));
        assert_eq!(
            generator.generate(0, 5).unwrap_err(),
            MazeError::InvalidDimension {
                num_rows: 0,
                num_cols: 5
            }
        );
        assert_eq!(
            generator.generate(5, 0).unwrap_err(),
            MazeError::InvalidDimension {
                num_rows: 5,
                num_cols: 0
            }
        );
    }

    #[test]
    fn single_room_maze_is_all_walls() {
        let mut generator = MazeGenerator::new(Some(0));
        let maze = generator.generate(1, 1).unwrap();
        assert_eq!(maze.to_string(), "f");

        let point = Point { row: 0, col: 0 };
        let solution = maze.solve(point, point, SolveMode::Pruned).unwrap();
        assert_eq!(solution.to_string(), "PRUNED\n0, 0");
    }

    #[test]
    fn two_room_maze_has_a_single_passage() {
        let mut generator = MazeGenerator::new(Some(1));
        let maze = generator.generate(1, 2).unwrap();
        // The only spanning tree of two rooms: one east-west passage
        assert_eq!(maze.to_string(), "d7");

        let solution = maze
            .solve(
                Point { row: 0, col: 0 },
                Point { row: 0, col: 1 },
                SolveMode::Pruned,
            )
            .unwrap();
        assert_eq!(solution.to_string(), "PRUNED\n0, 0\n0, 1");
    }

    #[test]
    fn opposite_sides_of_every_shared_edge_agree() {
        let mut generator = MazeGenerator::new(Some(7));
        let maze = generator.generate(9, 7).unwrap();

        for row in 0..9 {
            for col in 0..7 {
                let point = Point { row, col };
                for direction in Direction::ALL {
                    if let Some(neighbor) = direction.step(point, 9, 7) {
                        assert_eq!(
                            maze.room(point).connection(direction),
                            maze.room(neighbor).connection(direction.opposite()),
                            "sides disagree between ({point}) and ({neighbor})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn border_rooms_are_walled_towards_the_outside() {
        let mut generator = MazeGenerator::new(Some(11));
        let maze = generator.generate(6, 13).unwrap();

        for row in 0..6 {
            for col in 0..13 {
                let point = Point { row, col };
                for direction in Direction::ALL {
                    if direction.step(point, 6, 13).is_none() {
                        assert_eq!(
                            maze.room(point).connection(direction),
                            Connection::Wall,
                            "room ({point}) opens towards the outside"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn open_connections_form_a_spanning_tree() {
        let (num_rows, num_cols) = (12, 9);
        let mut generator = MazeGenerator::new(Some(99));
        let maze = generator.generate(num_rows, num_cols).unwrap();

        let mut graph: Graph<(), (), Undirected> = Graph::new_undirected();
        let nodes: Vec<_> = (0..num_rows * num_cols)
            .map(|_| graph.add_node(()))
            .collect();
        for row in 0..num_rows {
            for col in 0..num_cols {
                let point = Point { row, col };
                // East and south cover each shared edge exactly once
                for direction in [Direction::East, Direction::South] {
                    if maze.room(point).is_open(direction) {
                        let neighbor = maze.neighbor(point, direction);
                        graph.add_edge(
                            nodes[row * num_cols + col],
                            nodes[neighbor.row * num_cols + neighbor.col],
                            (),
                        );
                    }
                }
            }
        }

        assert_eq!(graph.edge_count(), num_rows * num_cols - 1);
        assert_eq!(connected_components(&graph), 1);
    }

    #[test]
    fn same_seed_reproduces_the_maze() {
        let mut first = MazeGenerator::new(Some(42));
        let mut second = MazeGenerator::new(Some(42));
        assert_eq!(
            first.generate(16, 16).unwrap().to_string(),
            second.generate(16, 16).unwrap().to_string()
        );
    }

    #[test]
    fn different_seeds_produce_different_mazes() {
        let mut first = MazeGenerator::new(Some(1));
        let mut second = MazeGenerator::new(Some(2));
        assert_ne!(
            first.generate(16, 16).unwrap().to_string(),
            second.generate(16, 16).unwrap().to_string()
        );
    }

    #[test]
    fn generated_maze_survives_encode_and_parse() {
        let mut generator = MazeGenerator::new(Some(3));
        let maze = generator.generate(15, 15).unwrap();

        let text = maze.to_string();
        let reloaded = Maze::parse_hex(&text, 15, 15).unwrap();
        assert_eq!(reloaded.to_string(), text);
    }
}
