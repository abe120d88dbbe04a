use std::rc::Rc;

pub type Identifier = Rc<String>;

pub fn ident(name: &str) -> Identifier {
    Rc::new(name.to_string())
}
